use anyhow::Result;
use calboard_core::grid;
use calboard_core::store::EventStore;
use calboard_core::{CalendarViewModel, MonthCursor};

use super::parse_date;
use crate::render;

pub async fn run<S: EventStore>(
    vm: &CalendarViewModel<S>,
    date: Option<&str>,
    shift: i32,
) -> Result<()> {
    let cursor = match date {
        Some(date) => MonthCursor::new(parse_date(date)?),
        None => MonthCursor::today(),
    };

    vm.set_month(cursor.shift(shift)).await?;

    let days = grid::by_day(&vm.events());
    println!("{}", render::month(&vm.month_label(), vm.is_current_month(), &days));

    Ok(())
}
