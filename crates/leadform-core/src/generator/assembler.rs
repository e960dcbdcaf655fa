//! Markup/Style Assembler
//!
//! Title, progress indicator, steps with their field grid, consent block,
//! navigation, message area and the runtime module, combined into one
//! document.

use crate::domain::FormConfig;
use crate::generator::consent::render_consents;
use crate::generator::fields::{render_field, FieldContext};
use crate::generator::layout::{FormLayout, Step};
use crate::generator::markup::{Document, Element};
use crate::generator::style::scoped_stylesheet;

/// Static parts of a document; the module source is produced separately
pub struct Assembly<'a> {
    pub wrapper_id: &'a str,
    pub layout: &'a FormLayout<'a>,
    pub config: &'a FormConfig,
    pub module_source: String,
}

impl Assembly<'_> {
    pub fn document(&self) -> Document {
        let title = self.config.style.visible_title().unwrap_or("Lead form");

        Document::new("en")
            .head(Element::new("meta").attr("charset", "utf-8"))
            .head(
                Element::new("meta")
                    .attr("name", "viewport")
                    .attr("content", "width=device-width, initial-scale=1"),
            )
            .head(Element::new("title").text(title))
            .head(Element::new("style").raw(scoped_stylesheet(self.wrapper_id, &self.config.style)))
            .body(self.wrapper())
            .body(
                Element::new("script")
                    .attr("type", "module")
                    .raw(self.module_source.as_str()),
            )
    }

    fn wrapper(&self) -> Element {
        let ctx = FieldContext {
            id_prefix: self.wrapper_id,
        };

        let form = Element::new("form")
            .attr("class", "lf-form")
            .attr("data-role", "form")
            .attr("autocomplete", "off")
            .flag("novalidate")
            .children(self.layout.steps().iter().map(|step| self.step(step, ctx)))
            .child(
                Element::new("div")
                    .attr("class", "lf-message")
                    .attr("role", "alert")
                    .attr("data-role", "message")
                    .flag("hidden"),
            );

        Element::new("div")
            .attr("id", self.wrapper_id)
            .attr("class", "lf-root")
            .child_opt(
                self.config
                    .style
                    .visible_title()
                    .map(|t| Element::new("h2").attr("class", "lf-title").text(t)),
            )
            .child_opt(self.progress())
            .child(form)
    }

    /// "Step i of N" plus a bar; only for real multi-step layouts
    fn progress(&self) -> Option<Element> {
        if !self.layout.is_multi_step() || !self.config.style.show_step_indicator {
            return None;
        }
        let total = self.layout.total_steps();
        let width = 100.0 / f64::from(total);

        Some(
            Element::new("div")
                .attr("class", "lf-progress")
                .attr("data-role", "progress")
                .child(
                    Element::new("div")
                        .attr("class", "lf-progress-text")
                        .text("Step ")
                        .child(
                            Element::new("span")
                                .attr("data-role", "current-step")
                                .text("1"),
                        )
                        .text(" of ")
                        .child(
                            Element::new("span")
                                .attr("data-role", "total-steps")
                                .text(total.to_string()),
                        ),
                )
                .child(
                    Element::new("div").attr("class", "lf-progress-track").child(
                        Element::new("div")
                            .attr("class", "lf-progress-bar")
                            .attr("style", format!("width: {width}%")),
                    ),
                ),
        )
    }

    fn step(&self, step: &Step<'_>, ctx: FieldContext<'_>) -> Element {
        let class = if step.index == 1 {
            "lf-step lf-step-active"
        } else {
            "lf-step"
        };

        let grid = (!step.fields.is_empty()).then(|| {
            Element::new("div").attr("class", "lf-grid").children(
                step.fields
                    .iter()
                    .map(|p| render_field(p.field, &p.assignment, p.position, ctx)),
            )
        });

        let consents = step
            .carries_submit()
            .then(|| render_consents(&self.config.consent, ctx))
            .flatten();

        Element::new("div")
            .attr("class", class)
            .attr("data-step", step.index.to_string())
            .child_opt(grid)
            .child_opt(consents)
            .child(self.navigation(step))
    }

    fn navigation(&self, step: &Step<'_>) -> Element {
        let back = (step.index > 1).then(|| {
            button("button", "lf-btn lf-btn-secondary", "prev").text("Back")
        });

        let forward = if step.carries_submit() {
            button("submit", "lf-btn lf-submit", "submit").text(self.config.style.submit_label())
        } else {
            button("button", "lf-btn", "next").text("Next")
        };

        Element::new("div")
            .attr("class", "lf-nav")
            .child_opt(back)
            .child(forward)
    }
}

fn button(kind: &'static str, class: &'static str, action: &'static str) -> Element {
    Element::new("button")
        .attr("type", kind)
        .attr("class", class)
        .attr("data-action", action)
}
