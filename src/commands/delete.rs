use anyhow::Result;
use calboard_core::CalendarViewModel;
use calboard_core::store::EventStore;

use super::{execute, open_event};

pub async fn run<S: EventStore>(vm: &CalendarViewModel<S>, id: &str) -> Result<()> {
    let mut panel = open_event(vm, id).await?;
    let command = panel.request_delete();
    execute(vm, command).await
}
