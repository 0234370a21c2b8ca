use anyhow::Result;
use calboard_core::CalendarViewModel;
use calboard_core::store::EventStore;

use super::{FormChanges, execute, invalid_form, open_day, parse_date};

pub async fn run<S: EventStore>(
    vm: &CalendarViewModel<S>,
    date: &str,
    changes: FormChanges,
) -> Result<()> {
    let day = parse_date(date)?;
    let mut panel = open_day(vm, day).await?;
    panel.request_add();

    let mut form = panel.form_for_current().unwrap_or_default();
    changes.apply(&mut form);

    let command = panel.save_new(&form).map_err(invalid_form)?;
    execute(vm, command).await
}
