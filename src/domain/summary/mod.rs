//! Summary domain - human-readable shopping list messages

mod format;
mod message;

pub use format::{format_amount, format_date, format_line_amount};
pub use message::{
    format_categorized_message, format_plain_message, group_by_category, CategoryGroup,
};
