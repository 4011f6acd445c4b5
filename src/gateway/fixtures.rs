//! In-memory fixture collections backing the mock transport.
//!
//! Collections hold raw JSON records so the dispatcher can serve any entity
//! through one code path. Filtering is case-insensitive substring search
//! plus status equality; pagination slices the filtered set.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::{json, Value};

use crate::envelope::Pagination;

/// List-query parameters understood by every collection.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: u64,
    pub limit: u64,
}

impl ListQuery {
    pub fn page_or_default(&self) -> u64 {
        self.page.max(1)
    }

    pub fn limit_or_default(&self) -> u64 {
        if self.limit == 0 {
            10
        } else {
            self.limit
        }
    }
}

/// Shared, mutable fixture state for a mock-mode process.
pub struct FixtureStore {
    collections: RwLock<HashMap<&'static str, Vec<Value>>>,
}

impl FixtureStore {
    /// An empty store; collections materialize on first write.
    pub fn empty() -> Self {
        FixtureStore {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// A store pre-populated with the demo dataset.
    pub fn seeded() -> Self {
        let store = FixtureStore::empty();
        store.seed_demo_data();
        store
    }

    /// Number of records currently in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Filter + paginate a collection.
    ///
    /// The returned slice has length `min(limit, max(0, N - (page-1)*limit))`
    /// over the filtered record count N.
    pub fn query(
        &self,
        collection: &str,
        query: &ListQuery,
        search_fields: &[&str],
    ) -> (Vec<Value>, Pagination) {
        let guard = self.collections.read();
        let records = guard.get(collection).cloned().unwrap_or_default();
        drop(guard);

        let needle = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let filtered: Vec<Value> = records
            .into_iter()
            .filter(|record| {
                if let Some(ref status) = query.status {
                    if record.get("status").and_then(Value::as_str) != Some(status.as_str()) {
                        return false;
                    }
                }
                match needle {
                    Some(ref n) => search_fields.iter().any(|field| {
                        record
                            .get(*field)
                            .and_then(Value::as_str)
                            .map(|v| v.to_lowercase().contains(n))
                            .unwrap_or(false)
                    }),
                    None => true,
                }
            })
            .collect();

        let total = filtered.len() as u64;
        let page = query.page_or_default();
        let limit = query.limit_or_default();
        let start = ((page - 1) * limit) as usize;
        let slice: Vec<Value> = filtered
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();

        (slice, Pagination::for_slice(total, page, limit))
    }

    /// Fetch a single record by its id field.
    pub fn get(&self, collection: &str, id_field: &str, id: &str) -> Option<Value> {
        self.collections
            .read()
            .get(collection)?
            .iter()
            .find(|r| r.get(id_field).and_then(Value::as_str) == Some(id))
            .cloned()
    }

    /// Append a record, assigning a generated id when the id field is
    /// missing or empty. Returns the stored record.
    pub fn insert(&self, collection: &'static str, id_field: &str, mut record: Value) -> Value {
        let needs_id = record
            .get(id_field)
            .and_then(Value::as_str)
            .map(|s| s.is_empty())
            .unwrap_or(true);
        if needs_id {
            if let Some(obj) = record.as_object_mut() {
                obj.insert(
                    id_field.to_string(),
                    Value::String(uuid::Uuid::new_v4().to_string()),
                );
            }
        }
        let mut guard = self.collections.write();
        guard.entry(collection).or_default().push(record.clone());
        record
    }

    /// Shallow-merge a patch into the record with the given id. Returns the
    /// merged record, the mock's equivalent of "the server's object is the
    /// new source of truth".
    pub fn merge(&self, collection: &str, id_field: &str, id: &str, patch: &Value) -> Option<Value> {
        let mut guard = self.collections.write();
        let records = guard.get_mut(collection)?;
        let record = records
            .iter_mut()
            .find(|r| r.get(id_field).and_then(Value::as_str) == Some(id))?;
        if let (Some(target), Some(fields)) = (record.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                if key != id_field {
                    target.insert(key.clone(), value.clone());
                }
            }
        }
        Some(record.clone())
    }

    /// Remove the record with the given id. Returns true when a record
    /// was removed.
    pub fn remove(&self, collection: &str, id_field: &str, id: &str) -> bool {
        let mut guard = self.collections.write();
        let Some(records) = guard.get_mut(collection) else {
            return false;
        };
        let before = records.len();
        records.retain(|r| r.get(id_field).and_then(Value::as_str) != Some(id));
        records.len() < before
    }

    /// Snapshot a whole collection (used by the summary routes).
    pub fn all(&self, collection: &str) -> Vec<Value> {
        self.collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn seed(&self, collection: &'static str, records: Vec<Value>) {
        self.collections.write().insert(collection, records);
    }

    /// Populate every collection with believable demo records.
    fn seed_demo_data(&self) {
        self.seed(
            "clients",
            vec![
                json!({
                    "id": "cl-1001", "clientName": "Sharma Textiles", "clientContact": "9876543210",
                    "clientEmail": "accounts@sharmatextiles.example", "address": "14 MG Road, Pune",
                    "gst": "27ABCDE1234F1Z5", "pan": "ABCDE1234F", "status": "active",
                    "entryDate": "2025-04-18"
                }),
                json!({
                    "id": "cl-1002", "clientName": "Verma Exports", "clientContact": "9812345670",
                    "clientEmail": "finance@vermaexports.example", "address": "8 Park Street, Kolkata",
                    "gst": "19FGHIJ5678K2Z9", "pan": "FGHIJ5678K", "status": "active",
                    "entryDate": "2025-07-02"
                }),
                json!({
                    "id": "cl-1003", "clientName": "Iyer Consulting", "clientContact": "9900112233",
                    "clientEmail": "mail@iyerconsulting.example", "address": "22 Anna Salai, Chennai",
                    "gst": "33KLMNO9012P3Z1", "pan": "KLMNO9012P", "status": "inactive",
                    "entryDate": "2024-12-09"
                }),
                json!({
                    "id": "cl-1004", "clientName": "Desai Foods", "clientContact": "9765432109",
                    "clientEmail": "orders@desaifoods.example", "address": "3 CG Road, Ahmedabad",
                    "gst": "24QRSTU3456V4Z7", "pan": "QRSTU3456V", "status": "active",
                    "entryDate": "2026-01-21"
                }),
            ],
        );

        self.seed(
            "orders",
            vec![
                json!({
                    "orderNumber": "ORD-2026-001", "clientId": "cl-1001", "clientName": "Sharma Textiles",
                    "totalAmount": 118000.0, "gstAmount": 18000.0, "netAmount": 118000.0,
                    "paidAmount": 118000.0, "balanceAmount": 0.0,
                    "status": "completed", "paymentStatus": "paid", "orderDate": "2026-01-05",
                    "items": [
                        {"description": "GST registration", "quantity": 1.0, "rate": 100000.0,
                         "amount": 100000.0, "gstRate": 18.0, "gstAmount": 18000.0}
                    ]
                }),
                json!({
                    "orderNumber": "ORD-2026-002", "clientId": "cl-1002", "clientName": "Verma Exports",
                    "totalAmount": 59000.0, "gstAmount": 9000.0, "netAmount": 59000.0,
                    "paidAmount": 30000.0, "balanceAmount": 29000.0,
                    "status": "in_progress", "paymentStatus": "partial", "orderDate": "2026-02-11",
                    "items": [
                        {"description": "Export compliance filing", "quantity": 2.0, "rate": 25000.0,
                         "amount": 50000.0, "gstRate": 18.0, "gstAmount": 9000.0}
                    ]
                }),
                json!({
                    "orderNumber": "ORD-2026-003", "clientId": "cl-1004", "clientName": "Desai Foods",
                    "totalAmount": 23600.0, "gstAmount": 3600.0, "netAmount": 23600.0,
                    "paidAmount": 0.0, "balanceAmount": 23600.0,
                    "status": "pending", "paymentStatus": "unpaid", "orderDate": "2026-03-01",
                    "items": [
                        {"description": "FSSAI license renewal", "quantity": 1.0, "rate": 20000.0,
                         "amount": 20000.0, "gstRate": 18.0, "gstAmount": 3600.0}
                    ]
                }),
                json!({
                    "orderNumber": "ORD-2026-004", "clientId": "cl-1001", "clientName": "Sharma Textiles",
                    "totalAmount": 35400.0, "gstAmount": 5400.0, "netAmount": 35400.0,
                    "paidAmount": 35400.0, "balanceAmount": 0.0,
                    "status": "completed", "paymentStatus": "paid", "orderDate": "2026-03-17",
                    "items": [
                        {"description": "Quarterly GST filing", "quantity": 3.0, "rate": 10000.0,
                         "amount": 30000.0, "gstRate": 18.0, "gstAmount": 5400.0}
                    ]
                }),
                json!({
                    "orderNumber": "ORD-2026-005", "clientId": "cl-1002", "clientName": "Verma Exports",
                    "totalAmount": 82600.0, "gstAmount": 12600.0, "netAmount": 82600.0,
                    "paidAmount": 0.0, "balanceAmount": 82600.0,
                    "status": "cancelled", "paymentStatus": "unpaid", "orderDate": "2026-04-02",
                    "items": [
                        {"description": "Trademark registration", "quantity": 1.0, "rate": 70000.0,
                         "amount": 70000.0, "gstRate": 18.0, "gstAmount": 12600.0}
                    ]
                }),
            ],
        );

        self.seed(
            "leads",
            vec![
                json!({
                    "id": "ld-301", "name": "Kapoor Motors", "contact": "9811223344",
                    "email": "sales@kapoormotors.example", "source": "referral",
                    "status": "new", "priority": "high", "leadScore": 82,
                    "conversionProbability": 0.65, "followupDate": "2026-08-10",
                    "followupTime": "11:00", "createdAt": "2026-07-28"
                }),
                json!({
                    "id": "ld-302", "name": "Bose Interiors", "contact": "9766554433",
                    "email": "hello@boseinteriors.example", "source": "website",
                    "status": "call_followup", "priority": "medium", "leadScore": 58,
                    "conversionProbability": 0.4, "followupDate": "2026-08-07",
                    "followupTime": "15:30", "createdAt": "2026-07-15"
                }),
                json!({
                    "id": "ld-303", "name": "Nair Logistics", "contact": "9899887766",
                    "email": "ops@nairlogistics.example", "source": "campaign",
                    "status": "ready_for_quote", "priority": "high", "leadScore": 91,
                    "conversionProbability": 0.8, "followupDate": "2026-08-06",
                    "followupTime": "10:00", "createdAt": "2026-06-30"
                }),
                json!({
                    "id": "ld-304", "name": "Gupta Hardware", "contact": "9755443322",
                    "email": "", "source": "walk_in",
                    "status": "unreachable", "priority": "low", "leadScore": 21,
                    "conversionProbability": 0.1, "followupDate": null,
                    "followupTime": null, "createdAt": "2026-05-19"
                }),
            ],
        );

        self.seed(
            "employees",
            vec![
                json!({
                    "id": "emp-21", "name": "Priya Raghavan", "email": "priya@opsdesk.example",
                    "phone": "9833221100", "department": "Compliance", "role": "Senior Associate",
                    "status": "active", "joinDate": "2023-08-01",
                    "skills": ["GST", "Company Law"],
                    "performance": {"rating": 4.6, "completedTasks": 148}
                }),
                json!({
                    "id": "emp-22", "name": "Arjun Mehta", "email": "arjun@opsdesk.example",
                    "phone": "9822110033", "department": "Accounts", "role": "Accountant",
                    "status": "active", "joinDate": "2024-02-15",
                    "skills": ["Tally", "TDS"],
                    "performance": {"rating": 4.1, "completedTasks": 96}
                }),
                json!({
                    "id": "emp-23", "name": "Sneha Kulkarni", "email": "sneha@opsdesk.example",
                    "phone": "9811002244", "department": "Operations", "role": "Coordinator",
                    "status": "on_leave", "joinDate": "2022-11-20",
                    "skills": ["Scheduling"],
                    "performance": {"rating": 3.9, "completedTasks": 210}
                }),
            ],
        );

        self.seed(
            "consultants",
            vec![
                json!({
                    "id": "con-7", "name": "R. Subramanian", "email": "rs@taxadvisors.example",
                    "specialization": "Indirect Taxation", "status": "active", "hourlyRate": 3500.0,
                    "availability": [
                        {"day": "Mon", "from": "10:00", "to": "13:00"},
                        {"day": "Thu", "from": "14:00", "to": "18:00"}
                    ],
                    "skills": ["GST audits", "Appeals"]
                }),
                json!({
                    "id": "con-8", "name": "Meera Shah", "email": "meera@ipcounsel.example",
                    "specialization": "Intellectual Property", "status": "inactive", "hourlyRate": 4200.0,
                    "availability": [],
                    "skills": ["Trademarks"]
                }),
            ],
        );

        self.seed(
            "documents",
            vec![
                json!({
                    "id": "doc-501", "name": "Sharma Textiles GST Certificate.pdf",
                    "docType": "certificate", "category": "compliance", "fileSize": 482133,
                    "templateId": null, "uploadedBy": "emp-21", "createdAt": "2026-01-08",
                    "shares": [
                        {"sharedWith": "accounts@sharmatextiles.example", "permission": "view",
                         "sharedAt": "2026-01-09"}
                    ],
                    "versions": [
                        {"version": 1, "uploadedBy": "emp-21", "uploadedAt": "2026-01-08"}
                    ]
                }),
                json!({
                    "id": "doc-502", "name": "Engagement Letter - Verma Exports.docx",
                    "docType": "contract", "category": "legal", "fileSize": 88211,
                    "templateId": "tpl-2", "uploadedBy": "emp-22", "createdAt": "2026-02-12",
                    "shares": [],
                    "versions": [
                        {"version": 1, "uploadedBy": "emp-22", "uploadedAt": "2026-02-12"},
                        {"version": 2, "uploadedBy": "emp-22", "uploadedAt": "2026-02-20"}
                    ]
                }),
                json!({
                    "id": "doc-503", "name": "Board Resolution Template.docx",
                    "docType": "template", "category": "secretarial", "fileSize": 40960,
                    "templateId": null, "uploadedBy": "emp-21", "createdAt": "2025-09-30",
                    "shares": [], "versions": []
                }),
            ],
        );

        self.seed(
            "transactions",
            vec![
                json!({"id": "txn-901", "type": "income", "amount": 118000.0, "category": "services",
                       "description": "ORD-2026-001 settlement", "orderNumber": "ORD-2026-001",
                       "date": "2026-01-20"}),
                json!({"id": "txn-902", "type": "income", "amount": 30000.0, "category": "services",
                       "description": "Advance on ORD-2026-002", "orderNumber": "ORD-2026-002",
                       "date": "2026-02-15"}),
                json!({"id": "txn-903", "type": "expense", "amount": 42000.0, "category": "salaries",
                       "description": "February payroll", "orderNumber": null, "date": "2026-02-28"}),
                json!({"id": "txn-904", "type": "expense", "amount": 8500.0, "category": "rent",
                       "description": "Office rent", "orderNumber": null, "date": "2026-03-01"}),
                json!({"id": "txn-905", "type": "income", "amount": 35400.0, "category": "services",
                       "description": "ORD-2026-004 settlement", "orderNumber": "ORD-2026-004",
                       "date": "2026-03-25"}),
                json!({"id": "txn-906", "type": "expense", "amount": 2600.0, "category": "software",
                       "description": "Filing portal subscription", "orderNumber": null,
                       "date": "2026-04-05"}),
            ],
        );

        self.seed(
            "notifications",
            vec![
                json!({"id": "ntf-1", "title": "Order payment received",
                       "body": "ORD-2026-004 was paid in full.", "channel": "in_app",
                       "read": false, "deliveryStatus": "delivered", "createdAt": "2026-03-25T10:04:00Z"}),
                json!({"id": "ntf-2", "title": "Lead followup due",
                       "body": "Nair Logistics followup is due today.", "channel": "in_app",
                       "read": false, "deliveryStatus": "delivered", "createdAt": "2026-08-06T04:30:00Z"}),
                json!({"id": "ntf-3", "title": "GST filing window open",
                       "body": "Quarterly filings open for 3 clients.", "channel": "email",
                       "read": true, "deliveryStatus": "sent", "createdAt": "2026-07-01T06:00:00Z"}),
                json!({"id": "ntf-4", "title": "Document shared",
                       "body": "GST certificate shared with Sharma Textiles.", "channel": "email",
                       "read": true, "deliveryStatus": "delivered", "createdAt": "2026-01-09T09:12:00Z"}),
            ],
        );

        self.seed(
            "channels",
            vec![
                json!({"id": "ch-1", "name": "Transactional Email", "channelType": "email",
                       "enabled": true, "deliveryStatus": "delivered"}),
                json!({"id": "ch-2", "name": "SMS Alerts", "channelType": "sms",
                       "enabled": false, "deliveryStatus": "pending"}),
                json!({"id": "ch-3", "name": "WhatsApp Business", "channelType": "whatsapp",
                       "enabled": true, "deliveryStatus": "delivered"}),
            ],
        );

        self.seed(
            "templates",
            vec![
                json!({"id": "tpl-1", "name": "Payment Reminder", "channel": "email",
                       "subject": "Payment pending for {{orderNumber}}",
                       "body": "Dear {{clientName}}, a balance of {{balanceAmount}} is pending.",
                       "variables": ["clientName", "orderNumber", "balanceAmount"]}),
                json!({"id": "tpl-2", "name": "Engagement Letter", "channel": "email",
                       "subject": "Engagement terms",
                       "body": "Dear {{clientName}}, please find our engagement terms attached.",
                       "variables": ["clientName"]}),
            ],
        );

        self.seed(
            "audit_events",
            vec![
                json!({"id": "aud-1", "actor": "admin@opsdesk.example", "action": "login",
                       "ipAddress": "10.4.0.12", "severity": "info",
                       "createdAt": "2026-08-05T08:55:00Z"}),
                json!({"id": "aud-2", "actor": "priya@opsdesk.example", "action": "client.update",
                       "ipAddress": "10.4.0.33", "severity": "info",
                       "createdAt": "2026-08-05T11:20:00Z"}),
                json!({"id": "aud-3", "actor": "unknown", "action": "login.failed",
                       "ipAddress": "203.0.113.50", "severity": "warning",
                       "createdAt": "2026-08-06T02:14:00Z"}),
                json!({"id": "aud-4", "actor": "admin@opsdesk.example", "action": "settings.update",
                       "ipAddress": "10.4.0.12", "severity": "critical",
                       "createdAt": "2026-08-06T03:41:00Z"}),
            ],
        );
    }
}
