//! Totals over the transactions shown on the list page.

use maud::{Markup, html};

use crate::{
    html::{CARD_STYLE, format_rupiah, profit_style},
    transaction::{Transaction, clamp_rupiah},
};

/// Aggregates of a list of transactions, recomputed on every render.
///
/// Sums are taken in `i128`, so only a total that itself leaves the `i64`
/// range is clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionSummary {
    /// The number of transactions.
    pub count: usize,
    /// Purchase prices plus extra costs.
    pub total_cost_basis: i64,
    /// Sale prices.
    pub total_revenue: i64,
    /// Revenue minus cost basis.
    pub total_profit: i64,
    /// Total profit divided by count, rounded toward zero. Zero for an empty list.
    pub average_profit: i64,
}

impl TransactionSummary {
    /// Sum up `transactions`.
    pub fn new(transactions: &[Transaction]) -> Self {
        let (cost_basis, revenue) = transactions.iter().fold(
            (0_i128, 0_i128),
            |(cost_basis, revenue), transaction| {
                (
                    cost_basis
                        + i128::from(transaction.harga_beli)
                        + i128::from(transaction.biaya),
                    revenue + i128::from(transaction.harga_jual),
                )
            },
        );

        let count = transactions.len();
        let profit = revenue - cost_basis;
        let average_profit = if count == 0 {
            0
        } else {
            clamp_rupiah(profit / count as i128)
        };
        let total_cost_basis = clamp_rupiah(cost_basis);
        let total_revenue = clamp_rupiah(revenue);
        let total_profit = clamp_rupiah(profit);

        Self {
            count,
            total_cost_basis,
            total_revenue,
            total_profit,
            average_profit,
        }
    }

    /// Render the totals as a row of cards.
    pub fn into_html(self) -> Markup {
        html! {
            section
                id="summary"
                class="w-full grid gap-4 grid-cols-2 lg:grid-cols-5"
            {
                (card("Jumlah Transaksi", html! { (self.count) }, None))
                (card("Total Modal", html! { (format_rupiah(self.total_cost_basis)) }, None))
                (card("Total Penjualan", html! { (format_rupiah(self.total_revenue)) }, None))
                (card(
                    "Total Laba",
                    html! { (format_rupiah(self.total_profit)) },
                    Some(profit_style(self.total_profit)),
                ))
                (card(
                    "Rata-rata Laba",
                    html! { (format_rupiah(self.average_profit)) },
                    Some(profit_style(self.average_profit)),
                ))
            }
        }
    }
}

fn card(label: &str, value: Markup, value_style: Option<&str>) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p class={ "text-lg tabular-nums " (value_style.unwrap_or("font-semibold")) }
            {
                (value)
            }
        }
    }
}
