mod lists;

pub use lists::{
    ColorListManager, DEFAULT_FAVORITES_CAPACITY, DEFAULT_HISTORY_CAPACITY, ListError,
};
#[cfg(test)]
pub use lists::{FAVORITES_KEY, HISTORY_KEY, LAST_PICKED_KEY};
