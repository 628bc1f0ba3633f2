//! Repository abstractions for data access.

pub mod ledger;
pub mod loan;
pub mod mpesa;
pub mod notification;
pub mod pin;
pub mod wallet;

pub use ledger::LedgerRepository;
pub use loan::LoanRepository;
pub use mpesa::MpesaRepository;
pub use notification::NotificationRepository;
pub use pin::TransferPinRepository;
pub use wallet::WalletRepository;
