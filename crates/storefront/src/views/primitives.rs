//! Generic UI primitives shared by every page: buttons and slide-in drawers.

use std::fmt;

/// Button size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl ButtonSize {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// Button color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Danger,
    Outline,
    Ghost,
}

impl ButtonVariant {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Danger => "danger",
            Self::Outline => "outline",
            Self::Ghost => "ghost",
        }
    }
}

/// CSS classes for a button, rendered as `btn btn-<size> btn-<variant>`.
///
/// ```
/// use highland_storefront::views::{ButtonClass, ButtonSize, ButtonVariant};
///
/// let class = ButtonClass::new(ButtonSize::Large, ButtonVariant::Secondary);
/// assert_eq!(class.to_string(), "btn btn-large btn-secondary");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonClass {
    pub size: ButtonSize,
    pub variant: ButtonVariant,
}

impl ButtonClass {
    #[must_use]
    pub const fn new(size: ButtonSize, variant: ButtonVariant) -> Self {
        Self { size, variant }
    }

    /// Small ghost button, used for icon toggles and drawer close buttons.
    #[must_use]
    pub const fn toggle() -> Self {
        Self::new(ButtonSize::Small, ButtonVariant::Ghost)
    }
}

impl fmt::Display for ButtonClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "btn btn-{} btn-{}",
            self.size.as_str(),
            self.variant.as_str()
        )
    }
}

/// Edge of the viewport a drawer slides in from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawerPosition {
    #[default]
    Left,
    Right,
}

impl DrawerPosition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// A slide-in panel toggled by `static/js/app.js`.
///
/// The markup is rendered closed (`hidden`); toggles reference the drawer via
/// `data-drawer-toggle="<id>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawerView {
    pub id: String,
    pub position: DrawerPosition,
    pub title: String,
    /// Screen-reader description of the drawer's purpose.
    pub description: String,
}

impl DrawerView {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        position: DrawerPosition,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Element id of the drawer's title, referenced by `aria-labelledby`.
    #[must_use]
    pub fn title_id(&self) -> String {
        format!("{}-title", self.id)
    }

    /// CSS class for the drawer panel.
    #[must_use]
    pub fn panel_class(&self) -> String {
        format!("drawer drawer-{}", self.position.as_str())
    }

    /// Class of the drawer's close button.
    #[must_use]
    pub const fn close_button(&self) -> ButtonClass {
        ButtonClass::toggle()
    }
}
