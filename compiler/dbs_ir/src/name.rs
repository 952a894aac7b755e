//! Interned identifiers.

use std::fmt;

/// Interned, case-normalized identifier.
///
/// Identifiers in dbscript are case-insensitive, so the interner stores the
/// upper-case spelling and two `Name`s are equal exactly when the source
/// spellings match ignoring ASCII case. The first ids are reserved for the
/// well-known names below, pre-interned by [`StringInterner::new`].
///
/// [`StringInterner::new`]: crate::StringInterner::new
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct Name(u32);

macro_rules! well_known_names {
    ($($konst:ident = $text:literal,)*) => {
        impl Name {
            well_known_names!(@consts 0u32; $($konst,)*);
        }

        /// Spellings of the pre-interned names, in id order.
        pub(crate) const WELL_KNOWN: &[&str] = &[$($text,)*];
    };
    (@consts $idx:expr; $konst:ident, $($rest:ident,)*) => {
        pub const $konst: Name = Name($idx);
        well_known_names!(@consts $idx + 1; $($rest,)*);
    };
    (@consts $idx:expr;) => {};
}

well_known_names! {
    EMPTY = "",
    THIS = "THIS",
    SELF = "SELF",
    INIT = "INIT",
    DESTROY = "DESTROY",
    OPEN = "OPEN",
    FONT = "FONT",
    FORM = "FORM",
    DIALOG = "DIALOG",
    PUSHBUTTON = "PUSHBUTTON",
    MODAL = "MODAL",
    LEFT = "LEFT",
    TOP = "TOP",
    WIDTH = "WIDTH",
    HEIGHT = "HEIGHT",
    TEXT = "TEXT",
    CAPTION = "CAPTION",
    TITLE = "TITLE",
    NAME = "NAME",
    FAMILY = "FAMILY",
    SIZE = "SIZE",
    BOLD = "BOLD",
    ITALIC = "ITALIC",
    UNDERLINE = "UNDERLINE",
    ONCLICK = "ONCLICK",
    ONDBLCLICK = "ONDBLCLICK",
    ONMOUSEDOWN = "ONMOUSEDOWN",
    ONMOUSEUP = "ONMOUSEUP",
    ONMOUSEMOVE = "ONMOUSEMOVE",
    ONMOUSELBUTTON = "ONMOUSELBUTTON",
    ONMOUSERBUTTON = "ONMOUSERBUTTON",
    ONKEYDOWN = "ONKEYDOWN",
    ONKEYUP = "ONKEYUP",
    ONGOTFOCUS = "ONGOTFOCUS",
    ONLOSTFOCUS = "ONLOSTFOCUS",
}

impl Name {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) const fn from_index(index: u32) -> Self {
        Name(index)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}
