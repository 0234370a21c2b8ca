use anyhow::Result;
use calboard_core::CalendarViewModel;
use calboard_core::store::EventStore;

use crate::render::Render;

pub async fn run<S: EventStore>(vm: &CalendarViewModel<S>, id: &str) -> Result<()> {
    let event = vm.event(id).await?;
    println!("{}", event.render());
    Ok(())
}
