//! Invoice DTOs

use posada_core::models::Invoice;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Invoice response DTO
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    pub id: i32,
    pub booking_id: i32,
    pub amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            booking_id: invoice.booking_id,
            amount: invoice.amount.to_string().parse().unwrap_or(0.0),
            status: invoice.status.to_string(),
            created_at: invoice.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posada_core::models::InvoiceStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invoice_response_conversion() {
        let invoice = Invoice {
            id: 3,
            booking_id: 5,
            amount: dec!(100.00),
            status: InvoiceStatus::Paid,
            created_at: Utc::now(),
        };
        let response = InvoiceResponse::from(invoice);
        assert_eq!(response.booking_id, 5);
        assert_eq!(response.amount, 100.0);
        assert_eq!(response.status, "paid");
    }
}
