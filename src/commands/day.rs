use anyhow::Result;
use calboard_core::grid::{self, GridSignal};
use calboard_core::store::EventStore;
use calboard_core::{CalendarViewModel, MonthCursor, PanelController};

use super::parse_date;
use crate::render;

pub async fn run<S: EventStore>(vm: &CalendarViewModel<S>, date: &str) -> Result<()> {
    let day = parse_date(date)?;
    vm.set_month(MonthCursor::new(day)).await?;

    let mut panel = PanelController::new(vm.subscribe_events());
    grid::forward(GridSignal::DayClicked(day), &mut panel);

    println!("{}", render::day(day, &grid::display_events(&panel.day_events())));
    Ok(())
}
