use super::html::{bar_style, build_id, escape_html, options_html, value_style, SCRIPT_MODULE};
use super::{RenderTarget, SelectOption, UiGeneration};
use crate::controller::DeviceId;
use crate::layout::{DisplayLayout, Position};
use crate::monitor::MonitorView;
use std::fmt::Write as _;

const MONITOR_STYLE: &str = concat!(
    r#"<style type="text/css">input {margin:0px;} "#,
    ".skinned-form-controls input[type=\"checkbox\"]:disabled + span, ",
    ".skinned-form-controls input[type=\"checkbox\"]:disabled + span:before {opacity: 1.0;} ",
    "div.hr {height: 1px; background-image: linear-gradient(to right, rgba(0,0,0,0), rgba(200,200,200,0.9), rgba(0,0,0,0));} ",
    ".otgprogress {width: 70px; border: 0px;} ",
    ".otgprogress-bar {background-color: #AAAAAA; box-shadow: 1px 1px 1px #444444; width: 0%; height: 15px; opacity: 0.3; border-radius: 4px;} ",
    "div.err {color: #ABABAB}</style>"
);

const SETTINGS_STYLE: &str = "<style>span.customStyleSelectBox {border:0}</style>";

/// Top of the line between the flags and the messages
const FLAG_RULE_TOP: u16 = 120;
/// Top of the line above the error counters
const ERROR_RULE_TOP: u16 = 300;
/// Top of the error counter row
const ERROR_TOP: u16 = 310;

/// Table-based UI5 renderer with absolutely positioned monitor elements
#[derive(Debug, Clone, Copy, Default)]
pub struct Ui5Target;

fn absolute(position: Position) -> Option<(u16, u16, u16)> {
    match position {
        Position::Absolute {
            top,
            label_left,
            value_left,
        } => Some((top, label_left, value_left)),
        Position::Grid { .. } => None,
    }
}

impl RenderTarget for Ui5Target {
    fn generation(&self) -> UiGeneration {
        UiGeneration::Ui5
    }

    fn monitor(&self, device: DeviceId, layout: &DisplayLayout, view: &MonitorView) -> String {
        let mut html = String::from(MONITOR_STYLE);

        for cell in &view.flags {
            let Some((top, label_left, value_left)) = layout
                .flags
                .iter()
                .find(|f| f.family == cell.family && f.mask == cell.mask)
                .and_then(|f| absolute(f.position))
            else {
                continue;
            };
            let checked = if cell.checked { " checked" } else { "" };
            let _ = write!(
                html,
                r#"<div class="label" id="{}" style="position: absolute; top: {top}px; left: {label_left}px;">{}</div>"#,
                cell.label_id(),
                escape_html(&cell.label)
            );
            let _ = write!(
                html,
                r#"<div class="skinned-form-controls skinned-form-controls-mac" style="position: absolute; top: {top}px; left: {value_left}px;"><input type="checkbox" id="{}" disabled{checked}><span></span></div>"#,
                cell.check_id()
            );
        }
        let _ = write!(
            html,
            r#"<div class="hr" style="position: absolute; top: {FLAG_RULE_TOP}px; left: 28px; width: 570px;"></div>"#
        );

        for row in &view.messages {
            let Some((top, label_left, value_left)) =
                layout.message(row.id).and_then(|m| absolute(m.position))
            else {
                continue;
            };
            let _ = write!(
                html,
                r#"<div class="label" id="{}" style="position: absolute; top: {top}px; left: {label_left}px;">{}</div>"#,
                row.label_id(),
                escape_html(&row.text.label)
            );
            let _ = write!(
                html,
                r#"<div class="variable" id="{}" style="position: absolute; top: {top}px; left: {value_left}px; width: 50px; text-align: right;{}">{}</div>"#,
                row.value_id(),
                value_style(row),
                escape_html(&row.value)
            );
            let _ = write!(
                html,
                r#"<div class="variable" id="{}" style="position: absolute; top: {top}px; left: {}px;">{}</div>"#,
                row.unit_id(),
                value_left + 55,
                escape_html(&row.text.unit)
            );
            if let Some(bar) = &row.bar {
                let _ = write!(
                    html,
                    r#"<div class="otgprogress" style="position: absolute; top: {}px; left: {}px;"><div class="otgprogress-bar" id="{}" style="{}"></div></div>"#,
                    top.saturating_sub(1),
                    value_left + 3,
                    row.bar_id(),
                    bar_style(bar)
                );
            }
        }
        let _ = write!(
            html,
            r#"<div class="hr" style="position: absolute; top: {ERROR_RULE_TOP}px; left: 28px; width: 570px;"></div>"#
        );

        for (i, slot) in view.errors.iter().enumerate() {
            let left = 50 + 145 * i;
            let _ = write!(
                html,
                r#"<div class="err" id="{}" style="position: absolute; top: {ERROR_TOP}px; left: {left}px;" onClick="{SCRIPT_MODULE}.ResetError({device},{i})" title="Click to reset Error {:02}">{}</div>"#,
                build_id(&["err", &i.to_string()]),
                i + 1,
                escape_html(&slot.label)
            );
            let _ = write!(
                html,
                r#"<div class="err" id="{}" style="position: absolute; top: {ERROR_TOP}px; left: {}px; width: 30px; text-align: right">{}</div>"#,
                build_id(&["errval", &i.to_string()]),
                left + 50,
                escape_html(&slot.value)
            );
        }
        html
    }

    fn settings_page(&self, body: &str) -> String {
        format!(
            r#"{SETTINGS_STYLE}<table width="100%" border="0" cellspacing="3" cellpadding="0">{body}</table>"#
        )
    }

    fn heading(&self, text: &str) -> String {
        format!(
            r#"<tr><td colspan="3"><div class="label"><b>{}</b></div></td></tr>"#,
            escape_html(text)
        )
    }

    fn note(&self, html: &str) -> String {
        format!(r#"<tr><td colspan="3">{html}</td></tr>"#)
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
            r#"<tr><td><div class="label" id="{id}_div">{}</div></td><td colspan="2"><select id="{id}" class="styled">{}</select></td><td></td></tr>"#,
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
            r#"<tr><td><div class="label" id="{id}_div">{}</div></td><td colspan="2"><select id="{id}" multiple style="font-size:11px">{}</select></td><td></td></tr>"#,
            escape_html(label),
            options_html(options, selected)
        )
    }

    fn input(&self, device: DeviceId, label: &str, variable: &str, size: u8, value: &str) -> String {
        let id = build_id(&[variable, &device.to_string()]);
        format!(
            r#"<tr><td width="230">{}</td><td colspan="2"><input type="text" class="inputbox" size="{size}" id="{id}" value="{}"></td></tr>"#,
            escape_html(label),
            escape_html(value)
        )
    }

    fn save_button(&self, device: DeviceId, label: &str, callback: &str) -> String {
        format!(
            r#"<tr><td colspan="3"><input class="button" type="button" value="{}" onclick="{SCRIPT_MODULE}.{callback}('{device}');"></td></tr>"#,
            escape_html(label)
        )
    }
}
