pub mod interval;
pub mod item;
pub mod user;

pub use interval::{Interval, NewInterval};
pub use item::{Item, ItemPatch, NewItem, ResolvedItem};
pub use user::{NewUser, User, UserProfile};
