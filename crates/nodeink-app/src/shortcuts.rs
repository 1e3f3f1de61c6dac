//! Keyboard shortcut registry.

use nodeink_core::ToolKind;

/// A keyboard shortcut that selects a tool.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub tool: ToolKind,
}

impl Shortcut {
    pub const fn new(key: &'static str, tool: ToolKind) -> Self {
        Self { key, tool }
    }

    /// Text shown next to the key in help output.
    pub fn description(&self) -> String {
        format!("{} tool", self.tool)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("V", ToolKind::Select),
            Shortcut::new("N", ToolKind::AddNode),
            Shortcut::new("E", ToolKind::AddEdge),
            Shortcut::new("D", ToolKind::Remove),
        ]
    }

    /// Tool bound to a key. Matching ignores case.
    pub fn resolve(key: &str) -> Option<ToolKind> {
        Self::all()
            .into_iter()
            .find(|s| s.key.eq_ignore_ascii_case(key))
            .map(|s| s.tool)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:6} {}", shortcut.key, shortcut.description());
        }
        println!();
    }
}
