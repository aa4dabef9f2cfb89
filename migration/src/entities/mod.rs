pub mod budget;
pub mod transaction;
pub mod user;

pub use budget::Entity as BudgetEntity;
pub use transaction::Entity as TransactionEntity;
pub use user::Entity as UserEntity;
