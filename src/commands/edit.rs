use anyhow::Result;
use calboard_core::CalendarViewModel;
use calboard_core::store::EventStore;

use super::{FormChanges, execute, invalid_form, open_event};

pub async fn run<S: EventStore>(
    vm: &CalendarViewModel<S>,
    id: &str,
    changes: FormChanges,
) -> Result<()> {
    let mut panel = open_event(vm, id).await?;
    if !panel.request_edit() {
        anyhow::bail!("Event '{id}' could not be opened for editing");
    }

    let mut form = panel.form_for_current().unwrap_or_default();
    changes.apply(&mut form);

    let command = panel.save_edit(&form).map_err(invalid_form)?;
    execute(vm, command).await
}
