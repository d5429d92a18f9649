pub mod account;
pub mod notification;

pub use account::{Account, AccountCreate, AccountRepository, AccountUpdate};
pub use notification::{
    Notification, NotificationCreate, NotificationRepository, NotificationUpdate,
};
