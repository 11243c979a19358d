//! The transaction record and the margin computed from it.

use time::Date;

use crate::{auth::UserID, tenant::CompanyID};

/// Alias for the integer type used for transaction IDs.
pub type TransactionID = i64;

/// One car that was bought and sold.
///
/// Amounts are whole rupiah.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID assigned by the database.
    pub id: TransactionID,
    /// When the car was sold.
    pub tanggal: Date,
    /// The licence plate of the car, e.g. "B 1234 XYZ".
    pub nopol: String,
    /// What the dealer paid for the car.
    pub harga_beli: i64,
    /// Extra costs such as repairs and paperwork.
    pub biaya: i64,
    /// What the dealer sold the car for.
    pub harga_jual: i64,
    /// The user who recorded the transaction.
    pub user_id: UserID,
    /// The company the transaction belongs to.
    pub company_id: CompanyID,
}

impl Transaction {
    /// The margin on this car, see [TransactionDraft::profit].
    pub fn profit(&self) -> i64 {
        profit(self.harga_beli, self.biaya, self.harga_jual)
    }

    /// The editable fields of the transaction.
    pub fn draft(&self) -> TransactionDraft {
        TransactionDraft {
            tanggal: self.tanggal,
            nopol: self.nopol.clone(),
            harga_beli: self.harga_beli,
            biaya: self.biaya,
            harga_jual: self.harga_jual,
        }
    }
}

/// The fields a user enters for a transaction. The owner and company are added
/// when it is saved and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// When the car was sold.
    pub tanggal: Date,
    /// The licence plate of the car.
    pub nopol: String,
    /// What the dealer paid for the car.
    pub harga_beli: i64,
    /// Extra costs, zero when none were entered.
    pub biaya: i64,
    /// What the dealer sold the car for.
    pub harga_jual: i64,
}

impl TransactionDraft {
    /// Sale price minus purchase price minus extra costs.
    pub fn profit(&self) -> i64 {
        profit(self.harga_beli, self.biaya, self.harga_jual)
    }
}

fn profit(harga_beli: i64, biaya: i64, harga_jual: i64) -> i64 {
    clamp_rupiah(i128::from(harga_jual) - i128::from(harga_beli) - i128::from(biaya))
}

/// Narrow a sum computed in `i128` back to an amount, saturating at the `i64` range.
pub(crate) fn clamp_rupiah(amount: i128) -> i64 {
    i64::try_from(amount).unwrap_or(if amount < 0 { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::TransactionDraft;

    fn draft(harga_beli: i64, biaya: i64, harga_jual: i64) -> TransactionDraft {
        TransactionDraft {
            tanggal: date!(2024 - 01 - 01),
            nopol: "B123XYZ".to_owned(),
            harga_beli,
            biaya,
            harga_jual,
        }
    }

    #[test]
    fn profit_is_sale_minus_purchase_minus_cost() {
        assert_eq!(draft(50_000_000, 2_000_000, 60_000_000).profit(), 8_000_000);
    }

    #[test]
    fn profit_without_cost() {
        assert_eq!(draft(50_000_000, 0, 60_000_000).profit(), 10_000_000);
    }

    #[test]
    fn loss_is_negative_profit() {
        assert_eq!(draft(70_000_000, 1_500_000, 65_000_000).profit(), -6_500_000);
    }

    #[test]
    fn profit_of_extreme_amounts_saturates() {
        assert_eq!(draft(i64::MIN, 0, 1).profit(), i64::MAX);
        assert_eq!(draft(i64::MAX, 1, 0).profit(), i64::MIN);
    }
}
