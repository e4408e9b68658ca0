//! Page objects for the ParaBank demo bank.

mod bill_pay;
mod home;
mod login;
mod register;
mod transfer;

pub use bill_pay::{BillPayPage, PayeeInfo, PaymentInfo};
pub use home::HomePage;
pub use login::LoginPage;
pub use register::{AccountInfo, PersonalInfo, RegisterPage};
pub use transfer::TransferFundsPage;
