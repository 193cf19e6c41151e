//! Transport-neutral chat output: text in a declared format plus an optional
//! inline keyboard. The bot crate maps these onto Telegram calls.

mod escape;
mod menus;
pub mod messages;
mod views;

pub use escape::{bold, escape_markdown, strip_markup};
pub use menus::{health_menu, level_picker, recipe_menu, saved_recipes_menu};
pub use views::{render_view, RecipeView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    MarkdownV2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

impl Button {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Inline keyboard, row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub rows: Vec<Vec<Button>>,
}

impl Menu {
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }

    /// Every payload in the menu, in row order.
    pub fn payloads(&self) -> Vec<&str> {
        self.rows
            .iter()
            .flatten()
            .map(|b| b.payload.as_str())
            .collect()
    }

    pub fn has_payload(&self, payload: &str) -> bool {
        self.payloads().contains(&payload)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: TextFormat,
    pub menu: Option<Menu>,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
            menu: None,
        }
    }

    /// `text` must already be valid MarkdownV2.
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::MarkdownV2,
            menu: None,
        }
    }

    pub fn with_menu(mut self, menu: Menu) -> Self {
        self.menu = Some(menu);
        self
    }

    /// The same reply as plain text, for when the platform rejects the markup.
    /// The menu is kept.
    pub fn plain_fallback(&self) -> Reply {
        let text = match self.format {
            TextFormat::MarkdownV2 => strip_markup(&self.text),
            TextFormat::Plain => self.text.clone(),
        };
        Reply {
            text,
            format: TextFormat::Plain,
            menu: self.menu.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fallback_strips_and_keeps_menu() {
        let menu = Menu::new(vec![vec![Button::new("Save", "save_last_recipe")]]);
        let reply = Reply::markdown(format!("{} {}", bold("Total:"), escape_markdown("1.5 h")))
            .with_menu(menu.clone());

        let fallback = reply.plain_fallback();
        assert_eq!(fallback.text, "Total: 1.5 h");
        assert_eq!(fallback.format, TextFormat::Plain);
        assert_eq!(fallback.menu, Some(menu));
    }

    #[test]
    fn plain_fallback_of_plain_is_identity() {
        let reply = Reply::plain("a*b\\c");
        assert_eq!(reply.plain_fallback(), reply);
    }

    #[test]
    fn menu_payloads_in_order() {
        let menu = Menu::new(vec![
            vec![Button::new("a", "1"), Button::new("b", "2")],
            vec![Button::new("c", "3")],
        ]);
        assert_eq!(menu.payloads(), vec!["1", "2", "3"]);
        assert!(menu.has_payload("3"));
        assert!(!menu.has_payload("4"));
    }
}
