pub mod crypto_tx;
pub mod document;
pub mod due_diligence_report;
pub mod investment;
pub mod notification;
pub mod payment_intent;
pub mod sea_orm_active_enums;
pub mod startup;
pub mod token;
pub mod user;
pub mod vesting;
pub mod waitlist_entry;
pub mod wallet;

pub use sea_orm_active_enums::*;

pub use crypto_tx::Entity as CryptoTx;
pub use document::Entity as Document;
pub use due_diligence_report::Entity as DueDiligenceReport;
pub use investment::Entity as Investment;
pub use notification::Entity as Notification;
pub use payment_intent::Entity as PaymentIntent;
pub use startup::Entity as Startup;
pub use token::Entity as Token;
pub use user::Entity as User;
pub use vesting::Entity as Vesting;
pub use waitlist_entry::Entity as WaitlistEntry;
pub use wallet::Entity as Wallet;
