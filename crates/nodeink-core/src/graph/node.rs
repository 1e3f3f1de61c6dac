//! Graph nodes and their typed attribute accessors.

use super::{GraphError, GraphResult};
use kurbo::Point;
use std::collections::HashMap;

/// Position used when a node has no usable `pos` attribute.
pub const DEFAULT_POS: Point = Point::new(10.0, 10.0);
/// Default line color.
pub const DEFAULT_COLOR: &str = "black";
/// Default fill color.
pub const DEFAULT_FILL_COLOR: &str = "lightgrey";
/// Default shape.
pub const DEFAULT_SHAPE: &str = "circle";

pub(crate) const ATTR_LABEL: &str = "label";
pub(crate) const ATTR_POS: &str = "pos";
pub(crate) const ATTR_COLOR: &str = "color";
pub(crate) const ATTR_FILL_COLOR: &str = "fillcolor";
pub(crate) const ATTR_SHAPE: &str = "shape";

/// An attributed vertex, identified by its name.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    attributes: HashMap<String, String>,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: HashMap::new(),
        }
    }

    /// The node's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a raw attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Set a raw attribute value.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.remove(key)
    }

    /// All raw attributes.
    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Label to display; falls back to the name.
    pub fn label(&self) -> &str {
        match self.attribute(ATTR_LABEL) {
            Some(label) if !label.is_empty() => label,
            _ => &self.name,
        }
    }

    /// Set the label. `None` reverts to displaying the name.
    pub fn set_label(&mut self, label: Option<&str>) {
        match label {
            Some(label) => self.set_attribute(ATTR_LABEL, label),
            None => {
                self.remove_attribute(ATTR_LABEL);
            }
        }
    }

    /// Parse the stored position.
    ///
    /// Fails with [`GraphError::InvalidAttributeValue`] when the attribute is
    /// absent or is not two comma separated numbers.
    pub fn try_pos(&self) -> GraphResult<Point> {
        let raw = self.attribute(ATTR_POS).ok_or_else(|| GraphError::InvalidAttributeValue {
            key: ATTR_POS.to_string(),
            value: String::new(),
        })?;
        parse_pos(raw).ok_or_else(|| GraphError::InvalidAttributeValue {
            key: ATTR_POS.to_string(),
            value: raw.to_string(),
        })
    }

    /// Center where the node should be drawn, or [`DEFAULT_POS`].
    pub fn pos(&self) -> Point {
        self.try_pos().unwrap_or(DEFAULT_POS)
    }

    /// Set the center position.
    pub fn set_pos(&mut self, x: f64, y: f64) {
        self.set_attribute(ATTR_POS, format!("{},{}", x, y));
    }

    /// Line color.
    pub fn color(&self) -> &str {
        self.attribute_or(ATTR_COLOR, DEFAULT_COLOR)
    }

    pub fn set_color(&mut self, color: &str) {
        self.set_attribute(ATTR_COLOR, color);
    }

    /// Fill color.
    pub fn fill_color(&self) -> &str {
        self.attribute_or(ATTR_FILL_COLOR, DEFAULT_FILL_COLOR)
    }

    pub fn set_fill_color(&mut self, color: &str) {
        self.set_attribute(ATTR_FILL_COLOR, color);
    }

    /// Shape to draw (default "circle").
    pub fn shape(&self) -> &str {
        self.attribute_or(ATTR_SHAPE, DEFAULT_SHAPE)
    }

    pub fn set_shape(&mut self, shape: &str) {
        self.set_attribute(ATTR_SHAPE, shape);
    }

    fn attribute_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.attribute(key) {
            Some(value) if !value.is_empty() => value,
            _ => default,
        }
    }
}

fn parse_pos(raw: &str) -> Option<Point> {
    let mut parts = raw.split(',');
    let x = parts.next()?.trim().parse::<f64>().ok()?;
    let y = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() || !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some(Point::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let node = Node::new("a");
        assert_eq!(node.label(), "a");
        assert_eq!(node.color(), "black");
        assert_eq!(node.fill_color(), "lightgrey");
        assert_eq!(node.shape(), "circle");
        assert_eq!(node.pos(), DEFAULT_POS);
    }

    #[test]
    fn test_set_pos() {
        let mut node = Node::new("a");
        node.set_pos(3.0, 4.0);
        assert_eq!(node.attribute("pos"), Some("3,4"));
        assert_eq!(node.pos(), Point::new(3.0, 4.0));

        node.set_pos(-1.5, 2.25);
        assert_eq!(node.pos(), Point::new(-1.5, 2.25));
    }

    #[test]
    fn test_malformed_pos_falls_back() {
        let mut node = Node::new("a");
        for raw in ["", "1", "1,2,3", "x,y", "1,", "NaN,1"] {
            node.set_attribute("pos", raw);
            assert!(node.try_pos().is_err(), "{raw:?} should not parse");
            assert_eq!(node.pos(), DEFAULT_POS);
        }

        node.set_attribute("pos", " 7 , 8 ");
        assert_eq!(node.pos(), Point::new(7.0, 8.0));
    }

    #[test]
    fn test_label() {
        let mut node = Node::new("a");
        node.set_label(Some("Alpha"));
        assert_eq!(node.label(), "Alpha");
        node.set_label(None);
        assert_eq!(node.label(), "a");
    }

    #[test]
    fn test_style_setters() {
        let mut node = Node::new("a");
        node.set_color("red");
        node.set_fill_color("white");
        node.set_shape("box");
        assert_eq!(node.color(), "red");
        assert_eq!(node.fill_color(), "white");
        assert_eq!(node.shape(), "box");
        assert_eq!(node.attribute("fillcolor"), Some("white"));
    }
}
