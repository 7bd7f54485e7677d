use super::html::{bar_style, build_id, escape_html, options_html, value_style, SCRIPT_MODULE};
use super::{RenderTarget, SelectOption, UiGeneration};
use crate::controller::DeviceId;
use crate::layout::{DisplayLayout, Position};
use crate::monitor::MonitorView;
use std::fmt::Write as _;

const MONITOR_STYLE: &str = concat!(
    r#"<style type="text/css">"#,
    "div.hr {height: 1px; margin-bottom: 5px; background-image: linear-gradient(to right, rgba(0,0,0,0), rgba(200,200,200,0.9), rgba(0,0,0,0));} ",
    "label.otg_progress {width: 70px; border: 0px;} ",
    "div.otg_progress-bar {background-color: #AAAAAA; box-shadow: 1px 1px 1px #444444; width: 0%; height: 20px; opacity: 0.3; border-radius: 4px;} ",
    "label.otg_var, input.otg_var {font-size: 15px; font-weight: normal;} ",
    "label.otg_err {font-size: 15px; font-weight: normal; color: #ABABAB}</style>"
);

/// Bootstrap-grid UI7 renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct Ui7Target;

impl RenderTarget for Ui7Target {
    fn generation(&self) -> UiGeneration {
        UiGeneration::Ui7
    }

    fn monitor(&self, device: DeviceId, layout: &DisplayLayout, view: &MonitorView) -> String {
        let mut html = String::from(MONITOR_STYLE);

        // Flags: one bootstrap row per grid row
        html.push_str(r#"&nbsp;<div class="container-fluid">"#);
        let mut current_row = None;
        for cell in &view.flags {
            let row = layout
                .flags
                .iter()
                .find(|f| f.family == cell.family && f.mask == cell.mask)
                .and_then(|f| match f.position {
                    Position::Grid { row, .. } => Some(row),
                    Position::Absolute { .. } => None,
                });
            if row != current_row {
                if current_row.is_some() {
                    html.push_str("</div>");
                }
                html.push_str(r#"<div class="row">"#);
                current_row = row;
            }
            let checked = if cell.checked { " checked" } else { "" };
            let _ = write!(
                html,
                r#"<div class="col-xs-12 col-sm-6 col-lg-4"><input class="customCheckbox otg_var" type="checkbox" id="{check}" disabled{checked}><label class="labelForCustomCheckbox" id="{label}" for="{check}">{text}</label></div>"#,
                check = cell.check_id(),
                label = cell.label_id(),
                text = escape_html(&cell.label)
            );
        }
        if current_row.is_some() {
            html.push_str("</div>");
        }
        html.push_str(r#"</div><div class="hr"></div>"#);

        // Messages in two columns
        html.push_str(r#"<div class="container-fluid"><div class="row">"#);
        for row in &view.messages {
            let _ = write!(
                html,
                r#"<div class="col-xs-12 col-md-6"><label class="otg_var" id="{}">{}</label>"#,
                row.label_id(),
                escape_html(&row.text.label)
            );
            let _ = write!(
                html,
                r#"<label class="otg_var" id="{}" style="position: absolute; left: 250px; width: 50px; text-align: right;{}">{}</label>"#,
                row.value_id(),
                value_style(row),
                escape_html(&row.value)
            );
            let _ = write!(
                html,
                r#"<label class="otg_var" id="{}" style="position: absolute; left: 305px;">{}</label>"#,
                row.unit_id(),
                escape_html(&row.text.unit)
            );
            if let Some(bar) = &row.bar {
                let _ = write!(
                    html,
                    r#"<label class="otg_progress" style="position: absolute; left: 253px;"><div class="otg_progress-bar" id="{}" style="{}"></div></label>"#,
                    row.bar_id(),
                    bar_style(bar)
                );
            }
            html.push_str("</div>");
        }
        html.push_str(r#"</div></div><div class="hr"></div>"#);

        // Error counters in four columns
        html.push_str(
            r#"<div class="container-fluid"><div class="row" style="margin-bottom: 5px; height: 20px; line-height: 20px;">"#,
        );
        for (i, slot) in view.errors.iter().enumerate() {
            let _ = write!(
                html,
                r#"<div class="col-xs-6 col-md-3"><label class="otg_err" id="{}" onClick="{SCRIPT_MODULE}.ResetError({device},{i})" title="Click to reset Error {:02}">{}</label>&nbsp;&nbsp;<label class="otg_err" id="{}">{}</label></div>"#,
                build_id(&["err", &i.to_string()]),
                i + 1,
                escape_html(&slot.label),
                build_id(&["errval", &i.to_string()]),
                escape_html(&slot.value)
            );
        }
        html.push_str("</div></div>");
        html
    }

    fn settings_page(&self, body: &str) -> String {
        format!(r#"<div class="deviceCpanelSettingsPage">{body}</div>"#)
    }

    fn heading(&self, text: &str) -> String {
        format!("<h4>{}</h4>", escape_html(text))
    }

    fn note(&self, html: &str) -> String {
        format!(r#"<div class="pull-left inputLabel">{html}</div>"#)
    }

    fn pulldown(
        &self,
        device: DeviceId,
        label: &str,
        variable: &str,
        options: &[SelectOption],
        selected: &str,
    ) -> String {
        let id = build_id(&[variable, &device.to_string()]);
        format!(
            r#"<div id="{id}_div" class="clearfix labelInputContainer"><div class="pull-left inputLabel" style="width:280px;">{}</div><div class="pull-left customSelectBoxContainer"><select id="{id}" class="customSelectBox">{}</select></div></div>"#,
            escape_html(label),
            options_html(options, &[selected])
        )
    }

    fn multi_pulldown(
        &self,
        device: DeviceId,
        label: &str,
        variable: &str,
        options: &[SelectOption],
        selected: &[&str],
    ) -> String {
        let id = build_id(&[variable, &device.to_string()]);
        format!(
            r#"<div id="{id}_div" class="clearfix labelInputContainer"><div class="pull-left inputLabel" style="width:280px;">{}</div><div class="pull-left"><select id="{id}" multiple>{}</select></div></div>"#,
            escape_html(label),
            options_html(options, selected)
        )
    }

    fn input(&self, device: DeviceId, label: &str, variable: &str, size: u8, value: &str) -> String {
        let id = build_id(&[variable, &device.to_string()]);
        format!(
            r#"<div id="{id}_div" class="clearfix labelInputContainer"><div class="pull-left inputLabel" style="width:280px;">{}</div><div class="pull-left"><input class="customInput" size="{size}" id="{id}" type="text" value="{}"></div></div>"#,
            escape_html(label),
            escape_html(value)
        )
    }

    fn save_button(&self, device: DeviceId, label: &str, callback: &str) -> String {
        format!(
            r#"<div class="cpanelSaveBtnContainer labelInputContainer clearfix"><input class="vBtn pull-right" type="button" value="{}" onclick="{SCRIPT_MODULE}.{callback}('{device}');"></div>"#,
            escape_html(label)
        )
    }
}
