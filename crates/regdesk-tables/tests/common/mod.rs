//! Common test fixtures for regdesk-tables tests

#![allow(dead_code)]

use regdesk_types::Record;
use rstest::*;
use serde_json::json;

/// Build one record from a JSON object literal
pub fn record(value: serde_json::Value) -> Record {
	Record::from_json(value).expect("fixture must be a JSON object")
}

/// Fixture providing registrations across several event shapes
#[fixture]
pub fn festival_records() -> Vec<Record> {
	vec![
		record(json!({
			"id": "a",
			"name": "Asha Roy",
			"email": "asha@example.com",
			"registration_status": "pending",
			"payment_verified": false,
			"created_at": "2025-01-02T10:00:00Z",
			"sub_events": [{"id": "x-press", "name": "X-Press", "fee": 100}]
		})),
		record(json!({
			"id": "b",
			"name": "Bikram Sen",
			"registration_status": "verified",
			"payment_verified": true,
			"utr_number": "UTR998877",
			"team_members": [
				{"name": "Bikram Sen", "phone": "9830000001"},
				{"name": "Chitra Das", "phone": "9830000002"}
			]
		})),
		record(json!({
			"id": "c",
			"name": "Dev Kumar",
			"college": "IISER Kolkata",
			"partner": {"name": "Esha", "email": "esha@iiserkol.ac.in"},
			"sub_events": [
				{"id": "survival", "name": "Survival"},
				{"id": "x-press", "name": "X-Press"}
			]
		})),
		record(json!({
			"id": "d",
			"name": "Farah \"Fizz\" Ali, Jr.",
			"registration_status": "cancelled",
			"payment_verified": "TRUE",
			"qr_used": true,
			"notes": "line one\nline two"
		})),
	]
}
