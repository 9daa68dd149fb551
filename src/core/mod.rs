pub mod coach;
pub mod confirm;
pub mod context;
pub mod dates;
pub mod export;
pub mod journal;
pub mod logging;
pub mod lookup;
pub mod progression;
pub mod selection;
pub mod sessions;
pub mod store;
pub mod volume;
