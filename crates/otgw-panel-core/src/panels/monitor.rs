//! Monitor tab

use crate::catalog::MessageCatalog;
use crate::controller::DeviceId;
use crate::gauge::BarMode;
use crate::layout::DisplayLayout;
use crate::monitor::MonitorView;
use crate::render::RenderTarget;
use crate::variables::VariableAccessor;

/// Variable selecting how bars are drawn
pub const MONITOR_BARS_VARIABLE: &str = "PluginMonitorBars";

/// A rendered Monitor tab together with the view the refresh task keeps current
#[derive(Debug, Clone)]
pub struct MonitorPanel {
    /// Markup for the host
    pub html: String,
    /// View state matching `html`
    pub view: MonitorView,
}

/// Build the Monitor tab for `device`
pub async fn build_monitor(
    target: &dyn RenderTarget,
    vars: &VariableAccessor,
    device: DeviceId,
    catalog: &MessageCatalog,
) -> MonitorPanel {
    let bars = BarMode::from_variable(&vars.get(device, MONITOR_BARS_VARIABLE).await);
    let layout = DisplayLayout::for_generation(target.generation());
    let view = MonitorView::build(&layout, catalog, bars);
    tracing::debug!(
        %device,
        ?bars,
        flags = view.flags.len(),
        messages = view.messages.len(),
        "monitor view built"
    );
    MonitorPanel {
        html: target.monitor(device, &layout, &view),
        view,
    }
}
