//! Scoped stylesheet
//!
//! Every rule is prefixed with the wrapper id. The first rule is the style
//! isolation boundary: everything inside the wrapper reverts to user-agent
//! styles before the form's own rules apply, so host-page CSS cannot leak in.

use crate::domain::value_objects::{StyleConfig, WidthShare};

/// Breakpoint between the mobile and desktop width shares
pub const DESKTOP_MIN_WIDTH_PX: u32 = 768;

pub fn isolation_boundary(wrapper_id: &str) -> String {
    format!("#{w}, #{w} *, #{w} *::before, #{w} *::after {{ all: revert; box-sizing: border-box; }}\n", w = wrapper_id)
}

pub fn scoped_stylesheet(wrapper_id: &str, style: &StyleConfig) -> String {
    let w = wrapper_id;
    let mut css = isolation_boundary(w);

    css.push_str(&format!(
        r#"#{w} {{
  max-width: 640px;
  margin: 0 auto;
  padding: 24px;
  border-radius: 12px;
  background: {bg};
  color: {text};
  font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
  font-size: 16px;
  line-height: 1.5;
}}
#{w} .lf-title {{
  margin: 0 0 16px;
  font-size: 1.5em;
  color: {text};
}}
#{w} .lf-progress {{
  margin-bottom: 20px;
}}
#{w} .lf-progress-text {{
  font-size: 0.875em;
  color: {label};
  margin-bottom: 6px;
}}
#{w} .lf-progress-track {{
  height: 6px;
  border-radius: 3px;
  background: rgba(0, 0, 0, 0.08);
  overflow: hidden;
}}
#{w} .lf-progress-bar {{
  height: 100%;
  background: {primary};
  transition: width 0.2s ease;
}}
#{w} .lf-step {{
  display: none;
}}
#{w} .lf-step.lf-step-active {{
  display: block;
}}
#{w} .lf-grid {{
  display: flex;
  flex-wrap: wrap;
  margin: 0 -8px;
}}
#{w} .lf-field {{
  padding: 0 8px;
  margin-bottom: 16px;
}}
#{w} .lf-label {{
  display: block;
  margin-bottom: 6px;
  font-weight: 600;
  color: {label};
}}
#{w} .lf-required {{
  color: #dc2626;
  margin-left: 2px;
}}
#{w} input:not([type="checkbox"]):not([type="radio"]),
#{w} select,
#{w} textarea {{
  display: block;
  width: 100%;
  padding: 10px 12px;
  font: inherit;
  color: {text};
  background: #ffffff;
  border: 1px solid #d1d5db;
  border-radius: 8px;
}}
#{w} input:focus,
#{w} select:focus,
#{w} textarea:focus {{
  outline: 2px solid {primary};
  outline-offset: 1px;
}}
#{w} .lf-radio-group {{
  display: flex;
  flex-direction: column;
  gap: 6px;
}}
#{w} .lf-choice,
#{w} .lf-checkbox-wrapper {{
  display: flex;
  align-items: flex-start;
  gap: 8px;
}}
#{w} .lf-checkbox-wrapper .lf-label {{
  display: inline;
  margin: 0;
}}
#{w} .lf-consents {{
  margin-bottom: 16px;
}}
#{w} .lf-consent {{
  margin-bottom: 8px;
  font-size: 0.875em;
}}
#{w} .lf-consent a {{
  color: {primary};
}}
#{w} .lf-has-error input,
#{w} .lf-has-error select,
#{w} .lf-has-error textarea,
#{w} .lf-radio-group.lf-has-error,
#{w} .lf-checkbox-wrapper.lf-has-error {{
  border-color: #dc2626;
  outline: 1px solid #dc2626;
}}
#{w} .lf-nav {{
  display: flex;
  gap: 12px;
  justify-content: flex-end;
}}
#{w} .lf-btn {{
  padding: 10px 20px;
  font: inherit;
  font-weight: 600;
  border: 1px solid {primary};
  border-radius: 8px;
  background: {primary};
  color: {button_text};
  cursor: pointer;
}}
#{w} .lf-btn.lf-btn-secondary {{
  background: transparent;
  color: {primary};
}}
#{w} .lf-btn:disabled {{
  opacity: 0.6;
  cursor: progress;
}}
#{w} .lf-message {{
  margin-top: 12px;
  padding: 10px 12px;
  border-radius: 8px;
  font-size: 0.875em;
}}
#{w} .lf-message[data-kind="error"] {{
  background: #fef2f2;
  color: #b91c1c;
}}
#{w} .lf-success {{
  padding: 24px 0;
  text-align: center;
  font-size: 1.125em;
  color: {text};
}}
"#,
        w = w,
        bg = style.form_background_color,
        text = style.text_color,
        label = style.label_color,
        primary = style.primary_color,
        button_text = style.button_text_color,
    ));

    for share in WidthShare::ALL {
        css.push_str(&format!(
            "#{w} .lf-w-m-{p} {{ flex: 0 0 {p}%; max-width: {p}%; }}\n",
            p = share.percent()
        ));
    }
    css.push_str(&format!("@media (min-width: {DESKTOP_MIN_WIDTH_PX}px) {{\n"));
    for share in WidthShare::ALL {
        css.push_str(&format!(
            "  #{w} .lf-w-d-{p} {{ flex: 0 0 {p}%; max-width: {p}%; }}\n",
            p = share.percent()
        ));
    }
    css.push_str("}\n");

    css
}
