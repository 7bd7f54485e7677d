//! Hardware tab: the gateway's configurable functions

use super::form::{FormBuilder, Panel};
use crate::catalog::HardwareCatalog;
use crate::controller::DeviceId;
use crate::render::{RenderTarget, SelectOption};
use crate::variables::VariableAccessor;

/// Build the Hardware tab from the gateway's option tables
pub async fn build_hardware(
    target: &dyn RenderTarget,
    vars: &VariableAccessor,
    device: DeviceId,
    catalog: &HardwareCatalog,
) -> Panel {
    let mut form = FormBuilder::new(target, vars, device);
    form.heading("Gateway configuration");

    for category in catalog.categories() {
        let options: Vec<SelectOption> = category
            .options
            .iter()
            .map(|o| SelectOption::new(o.value.clone(), o.label.clone()))
            .collect();
        for (label, variable) in category.instances() {
            form.pulldown(&label, &variable, &options).await;
        }
    }

    form.finish("Hardware_UpdateSettings")
}
