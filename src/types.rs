//! Entity records exchanged with the backend.
//!
//! All wire-facing types serialize camelCase. Entities are plain records;
//! referential integrity between them lives server-side, not here.

use serde::{Deserialize, Serialize};

/// Client lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
}

/// An onboarded client organization.
///
/// The original frontend carried read-only alias fields (`name`, `phone`,
/// `email`, `createdAt`) mirroring the backend fields. Here the aliases are
/// accessor methods, which makes the always-equal invariant structural.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub client_name: String,
    pub client_contact: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub address: String,
    /// GSTIN, validated by format only (no checksum).
    #[serde(default)]
    pub gst: String,
    /// PAN, validated by format only.
    #[serde(default)]
    pub pan: String,
    #[serde(default)]
    pub status: ClientStatus,
    #[serde(default)]
    pub entry_date: String,
}

impl Client {
    pub fn name(&self) -> &str {
        &self.client_name
    }

    pub fn phone(&self) -> &str {
        &self.client_contact
    }

    pub fn email(&self) -> &str {
        &self.client_email
    }

    pub fn created_at(&self) -> &str {
        &self.entry_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Partial,
    Paid,
}

/// One line item on an order, with its GST breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub description: String,
    pub quantity: f64,
    pub rate: f64,
    pub amount: f64,
    #[serde(default)]
    pub gst_rate: f64,
    #[serde(default)]
    pub gst_amount: f64,
}

/// A client order. Identity is `order_number`.
///
/// `balance_amount = net_amount - paid_amount` is a backend invariant; the
/// client displays whatever the server returned and does not recompute it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_number: String,
    pub client_id: String,
    #[serde(default)]
    pub client_name: String,
    pub total_amount: f64,
    #[serde(default)]
    pub gst_amount: f64,
    pub net_amount: f64,
    #[serde(default)]
    pub paid_amount: f64,
    #[serde(default)]
    pub balance_amount: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub order_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

/// A ledger entry, optionally tied to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    CallFollowup,
    Unreachable,
    Unqualified,
    Convert,
    ReadyForQuote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A sales-funnel record with scoring fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub lead_score: u32,
    #[serde(default)]
    pub conversion_probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followup_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followup_time: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    #[default]
    Active,
    OnLeave,
    Inactive,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePerformance {
    pub rating: f64,
    pub completed_tasks: u32,
}

/// An HR record for an in-house employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: StaffStatus,
    #[serde(default)]
    pub join_date: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub performance: EmployeePerformance,
}

/// A weekly availability window for a consultant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub day: String,
    pub from: String,
    pub to: String,
}

/// An external consultant engaged on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub status: StaffStatus,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default)]
    pub availability: Vec<AvailabilitySlot>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentShare {
    pub shared_with: String,
    #[serde(default)]
    pub permission: String,
    #[serde(default)]
    pub shared_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub version: u32,
    #[serde(default)]
    pub uploaded_by: String,
    #[serde(default)]
    pub uploaded_at: String,
}

/// A stored-file record with share and version sub-lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub doc_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default)]
    pub uploaded_by: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub shares: Vec<DocumentShare>,
    #[serde(default)]
    pub versions: Vec<DocumentVersion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    #[default]
    Pending,
    Sent,
    Delivered,
    Failed,
}

/// A user-facing notification, channel-scoped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub delivery_status: DeliveryStatus,
    #[serde(default)]
    pub created_at: String,
}

/// A configured delivery channel (email, sms, whatsapp, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationChannel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub channel_type: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub delivery_status: DeliveryStatus,
}

/// A reusable message template bound to a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub variables: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    #[default]
    Info,
    Warning,
    Critical,
}

/// A security/compliance audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub id: String,
    pub actor: String,
    pub action: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub severity: AuditSeverity,
    #[serde(default)]
    pub created_at: String,
}

/// The authenticated principal returned by login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
}

/// Login result: bearer token plus principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    pub user: AuthUser,
}

/// Dashboard landing aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_clients: u64,
    pub active_clients: u64,
    pub total_orders: u64,
    pub pending_orders: u64,
    pub open_leads: u64,
    pub total_revenue: f64,
    pub outstanding_balance: f64,
    pub unread_notifications: u64,
}

/// One month of the analytics series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: String,
    pub revenue: f64,
    pub orders: u64,
    pub leads_converted: u64,
}

/// Analytics view aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub monthly: Vec<MonthlyPoint>,
    pub conversion_rate: f64,
    pub average_order_value: f64,
}

/// Finance view aggregate derived from the transaction ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub net: f64,
    pub outstanding_balance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_wire_names_are_camel_case() {
        let client: Client = serde_json::from_value(json!({
            "id": "c-1",
            "clientName": "Acme Traders",
            "clientContact": "9876543210",
            "clientEmail": "ops@acme.example",
            "gst": "27ABCDE1234F1Z5",
            "pan": "ABCDE1234F",
            "status": "active",
            "entryDate": "2026-01-12"
        }))
        .unwrap();
        assert_eq!(client.client_name, "Acme Traders");
        assert_eq!(client.status, ClientStatus::Active);

        let raw = serde_json::to_value(&client).unwrap();
        assert!(raw.get("clientName").is_some());
        assert!(raw.get("client_name").is_none());
    }

    #[test]
    fn test_client_aliases_mirror_backend_fields() {
        let client = Client {
            id: "c-2".into(),
            client_name: "Globex".into(),
            client_contact: "9123456780".into(),
            client_email: "hello@globex.example".into(),
            address: String::new(),
            gst: String::new(),
            pan: String::new(),
            status: ClientStatus::Inactive,
            entry_date: "2025-11-02".into(),
        };
        assert_eq!(client.name(), client.client_name);
        assert_eq!(client.phone(), client.client_contact);
        assert_eq!(client.email(), client.client_email);
        assert_eq!(client.created_at(), client.entry_date);
    }

    #[test]
    fn test_lead_status_snake_case_wire_values() {
        assert_eq!(
            serde_json::to_value(LeadStatus::ReadyForQuote).unwrap(),
            json!("ready_for_quote")
        );
        assert_eq!(
            serde_json::from_value::<LeadStatus>(json!("call_followup")).unwrap(),
            LeadStatus::CallFollowup
        );
    }

    #[test]
    fn test_transaction_type_field_renamed() {
        let t = Transaction {
            id: "t-1".into(),
            transaction_type: TransactionType::Income,
            amount: 1200.0,
            category: "sales".into(),
            description: String::new(),
            order_number: Some("ORD-0007".into()),
            date: "2026-02-01".into(),
        };
        let raw = serde_json::to_value(&t).unwrap();
        assert_eq!(raw["type"], "income");
        assert_eq!(raw["orderNumber"], "ORD-0007");
    }
}
