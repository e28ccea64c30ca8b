//! The styling pass applied to a [`GeoGebraDocument`].

use std::fmt;

use super::color::{parse_color, Rgb};
use super::config::LayoutConfig;
use super::document::{is_element, is_view, GeoGebraDocument};
use super::tex::{strip_tex, wrap_tex};
use crate::config::DEFAULT_CAPTION;
use crate::error::Result;
use crate::schema::{SchemaRegistry, TypedObject};
use crate::value::decode;

/// `typeHidden` used for unknown hidden-line style names.
pub const HIDDEN_UNCHANGED: i64 = 2;

/// `typeHidden` value of a hidden-line style name, if it is one.
#[must_use]
pub fn hidden_line_style(name: &str) -> Option<i64> {
    match name {
        "invisible" => Some(0),
        "dotted" => Some(1),
        "unchanged" => Some(HIDDEN_UNCHANGED),
        _ => None,
    }
}

/// How many objects each styling step touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutReport {
    /// Views that received the background colour.
    pub background_views: usize,
    /// Element captions rewritten.
    pub captions: usize,
    /// Element line styles given a hidden-line style.
    pub line_styles: usize,
    /// Views whose axes settings were updated.
    pub axes_views: usize,
    /// Individual axes updated.
    pub axes: usize,
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} views recoloured, {} captions, {} line styles, {} axes in {} views",
            self.background_views, self.captions, self.line_styles, self.axes, self.axes_views
        )
    }
}

/// Axis settings read from the `axes` section.
#[derive(Debug, Clone, Copy)]
struct AxesStyle {
    show: bool,
    show_ticks: bool,
    show_numbers: bool,
    positive_axis_only: bool,
    color: Rgb,
}

impl AxesStyle {
    fn from_config(config: &LayoutConfig) -> Result<Self> {
        let palette = config.object("color_palette")?;
        Ok(Self {
            show: config.bool("axes.show")?,
            show_ticks: config.bool("axes.show_ticks")?,
            show_numbers: config.bool("axes.show_numbers")?,
            positive_axis_only: config.bool("axes.positive_axis_only")?,
            color: parse_color(config.get("axes.color")?, palette)?,
        })
    }
}

impl GeoGebraDocument<'_> {
    /// Run every styling step in order.
    ///
    /// # Errors
    /// The first missing or ill-typed configuration key, or a document
    /// structure error, aborts the pass.
    pub fn apply_layout(&mut self, config: &LayoutConfig) -> Result<LayoutReport> {
        let background_views = self.set_bg_color(config)?;
        let captions = self.set_caption_style(config)?;
        let line_styles = self.set_hidden_line_style(config)?;
        let (axes_views, axes) = self.set_axes_style(config)?;

        let report = LayoutReport {
            background_views,
            captions,
            line_styles,
            axes_views,
            axes,
        };
        tracing::debug!(%report, "layout applied");
        Ok(report)
    }

    /// Give every 2-D and 3-D view the configured background colour.
    ///
    /// # Errors
    /// `MissingConfigKey` for `background_color`/`color_palette` or an unknown
    /// palette name, `MalformedValue` for a malformed colour.
    pub fn set_bg_color(&mut self, config: &LayoutConfig) -> Result<usize> {
        let palette = config.object("color_palette")?;
        let color = parse_color(config.get("background_color")?, palette)?;
        let registry = self.registry;

        let mut count = 0;
        for view in self.root.children_mut().iter_mut().filter(|c| is_view(c)) {
            view.set_role("bgColor", color.to_object(registry, "BGColor")?)?;
            count += 1;
        }
        tracing::debug!(%color, views = count, "set background colour");
        Ok(count)
    }

    /// Normalize every element caption and re-wrap it as TeX when requested.
    ///
    /// Elements without a caption get one with the `%n` default.
    ///
    /// # Errors
    /// `MissingConfigKey` for `default_caption_style.tex`/`.bold`.
    pub fn set_caption_style(&mut self, config: &LayoutConfig) -> Result<usize> {
        let use_tex = config.bool("default_caption_style.tex")?;
        let use_bold = config.bool("default_caption_style.bold")?;
        let registry = self.registry;

        let mut count = 0;
        let construction = self.root.role_mut("construction")?;
        for element in construction.children_mut().iter_mut().filter(|c| is_element(c)) {
            let caption = caption_of(element, registry)?;
            let current = decode(caption.attr("val")?).unwrap_or_else(|| DEFAULT_CAPTION.to_string());
            let mut text = strip_tex(&current);
            if use_tex {
                text = wrap_tex(&text, use_bold);
            }
            caption.set_attr("val", text)?;
            count += 1;
        }
        tracing::debug!(tex = use_tex, bold = use_bold, captions = count, "set caption style");
        Ok(count)
    }

    /// Set `typeHidden` on every element line style that declares it.
    ///
    /// Elements without a line style are skipped.
    ///
    /// # Errors
    /// `MissingConfigKey` for `line_style.hidden_style`.
    pub fn set_hidden_line_style(&mut self, config: &LayoutConfig) -> Result<usize> {
        let value = config.get("line_style.hidden_style")?;
        let name = value.as_str().unwrap_or_default();
        let style = hidden_line_style(name).unwrap_or_else(|| {
            tracing::warn!(hidden_style = %value, "unknown hidden line style, keeping lines unchanged");
            HIDDEN_UNCHANGED
        });

        let mut count = 0;
        let mut skipped = 0;
        let construction = self.root.role_mut("construction")?;
        for child in construction.children_mut() {
            match line_style_of(child)? {
                Some(line_style) if line_style.has_attr("typeHidden") => {
                    line_style.set_attr("typeHidden", style)?;
                    count += 1;
                }
                _ => skipped += 1,
            }
        }
        tracing::debug!(type_hidden = style, line_styles = count, skipped, "set hidden line style");
        Ok(count)
    }

    /// Apply the `axes` section to every view and its axes.
    ///
    /// Returns the number of views and the number of axes touched.
    ///
    /// # Errors
    /// `MissingConfigKey` for any `axes.*` key, `MalformedValue` for a
    /// malformed `axes.color`.
    pub fn set_axes_style(&mut self, config: &LayoutConfig) -> Result<(usize, usize)> {
        let style = AxesStyle::from_config(config)?;
        let registry = self.registry;

        let mut views = 0;
        let mut axes = 0;
        for view in self.root.children_mut().iter_mut().filter(|c| is_view(c)) {
            view.role_mut("settings")?.set_attr("axes", style.show)?;
            if !view.is_a("EuclidianView3D") {
                view.set_role("axesColor", style.color.to_object(registry, "AxesColor")?)?;
            }
            for axis in view.children_of_mut("Axis") {
                axis.set_attr("show", style.show)?;
                if !style.show_ticks {
                    axis.set_attr("tickStyle", 0)?;
                }
                axis.set_attr("showNumbers", style.show_numbers)?;
                axis.set_attr("positiveAxis", style.positive_axis_only)?;
                axes += 1;
            }
            views += 1;
        }
        tracing::debug!(show = style.show, views, axes, "set axes style");
        Ok((views, axes))
    }
}

/// The caption of an element, created with the default text if missing.
fn caption_of<'a>(element: &'a mut TypedObject, registry: &SchemaRegistry) -> Result<&'a mut TypedObject> {
    if element.has_role("caption") {
        return element.role_mut("caption");
    }
    if let Some(index) = element.position_of("Caption") {
        return Ok(&mut element[index]);
    }
    element.add_child(registry.instantiate("Caption")?);
    let last = element.len() - 1;
    Ok(&mut element[last])
}

/// The line style of a construction child, by role or by type scan.
fn line_style_of(child: &mut TypedObject) -> Result<Option<&mut TypedObject>> {
    if child.has_role("lineStyle") {
        return child.role_mut("lineStyle").map(Some);
    }
    match child.position_of("LineStyle") {
        Some(index) => Ok(Some(&mut child[index])),
        None => Ok(None),
    }
}
