// Parsers for the small command-line grammars

pub mod lexer;
pub mod range;
pub mod selector;
pub mod style;

// Public API re-exports
pub use range::{parse_range, Bounds};
pub use selector::{parse_column_ref, parse_selector, ColumnRef, Selector};
pub use style::{coerce, parse_cycle, parse_style, StyleMap, StyleValue, STYLE_ALIASES};
