//! Random sample documents for unit tests and database loading.

use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StateName, StreetName, ZipCode};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::doc_filter::Document;
use crate::env::Env;

#[derive(Debug, Clone)]
pub struct DataGenerator {
    /// Epoch seconds at which the generator was created.
    pub created_at: i64,
}

impl Default for DataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataGenerator {
    pub fn new() -> Self {
        Self {
            created_at: Env::epoch() as i64,
        }
    }

    /// A fake person. `id` defaults to a fresh UUID v4 and `pk` (the
    /// partition key) to the person's state.
    pub fn random_person_document(&self, id: Option<&str>, pk: Option<&str>) -> Document {
        let state: String = StateName().fake();
        let city: String = CityName().fake();
        let address = format!(
            "{} {}\n{}, {} {}",
            BuildingNumber().fake::<String>(),
            StreetName().fake::<String>(),
            city,
            StateAbbr().fake::<String>(),
            ZipCode().fake::<String>(),
        );

        let doc_id = id.map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
        let doc_pk = pk.map_or_else(|| state.clone(), str::to_string);

        let doc = json!({
            "id": doc_id,
            "pk": doc_pk,
            "name": Name().fake::<String>(),
            "address": address,
            "city": city,
            "state": state,
            "email": SafeEmail().fake::<String>(),
            "phone": PhoneNumber().fake::<String>(),
            "proglang": "rust",
            "doctype": "sample",
        });
        match doc {
            Value::Object(map) => map,
            _ => unreachable!("json! object literal"),
        }
    }

    pub fn random_person_documents(&self, count: usize) -> Vec<Document> {
        (0..count)
            .map(|_| self.random_person_document(None, None))
            .collect()
    }
}
