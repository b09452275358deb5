//! Recall records as returned by the API and as exposed to callers.
//!
//! The API publishes records with French field names. [`translate`] maps the
//! known ones to a stable English vocabulary and copies every other key
//! through untouched, so fields added upstream survive the round trip.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Native field name to canonical field name.
pub const FIELD_RENAMES: &[(&str, &str)] = &[
    ("libelle", "product_name"),
    ("categorie_produit", "category"),
    ("sous_categorie_produit", "subcategory"),
    ("marque_produit", "brand"),
    ("date_publication", "publication_date"),
    ("motif_rappel", "recall_reason"),
    ("risques_encourus", "risks"),
    ("lien_vers_la_fiche_rappel", "recall_link"),
    ("numero_fiche", "sheet_number"),
    ("numero_version", "version_number"),
    ("rappel_guid", "recall_guid"),
    ("modeles_ou_references", "models_or_references"),
    ("identification_produits", "product_identification"),
    ("conditionnements", "packaging"),
    ("date_debut_commercialisation", "commercialization_start_date"),
    ("date_date_fin_commercialisation", "commercialization_end_date"),
    ("temperature_conservation", "storage_temperature"),
    ("marque_salubrite", "health_mark"),
    ("informations_complementaires", "additional_information"),
    ("zone_geographique_de_vente", "geographic_sales_area"),
    ("distributeurs", "distributors"),
    ("preconisations_sanitaires", "health_recommendations"),
    ("description_complementaire_risque", "additional_risk_description"),
    ("conduites_a_tenir_par_le_consommateur", "consumer_actions"),
    ("numero_contact", "contact_number"),
    ("modalites_de_compensation", "compensation_terms"),
    ("date_de_fin_de_la_procedure_de_rappel", "recall_procedure_end_date"),
    ("informations_complementaires_publiques", "public_additional_information"),
    ("liens_vers_les_images", "image_links"),
    ("lien_vers_la_liste_des_produits", "product_list_link"),
    ("lien_vers_la_liste_des_distributeurs", "distributor_list_link"),
    ("lien_vers_affichette_pdf", "poster_pdf_link"),
    ("nature_juridique_rappel", "legal_recall_nature"),
];

/// Identifier of a recall sheet.
pub type RecallId = i64;

/// Canonical name for a native field, or the native name if it is not mapped.
pub fn canonical_key(native: &str) -> &str {
    FIELD_RENAMES
        .iter()
        .find(|(from, _)| *from == native)
        .map_or(native, |(_, to)| *to)
}

/// A recall exactly as the API returned it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawRecord {
    pub id: RecallId,

    /// Every other field, in API order
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new(id: RecallId) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Builder-style field insertion.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// A recall with English field names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalRecord {
    pub id: RecallId,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CanonicalRecord {
    /// Look up a field by its canonical name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a textual field by its canonical name.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn product_name(&self) -> Option<&str> {
        self.text("product_name")
    }

    pub fn brand(&self) -> Option<&str> {
        self.text("brand")
    }

    pub fn publication_date(&self) -> Option<&str> {
        self.text("publication_date")
    }
}

/// Rename the native keys of a record and drop null fields.
pub fn translate(raw: RawRecord) -> CanonicalRecord {
    let fields = raw
        .fields
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (canonical_key(&key).to_string(), value))
        .collect();

    CanonicalRecord { id: raw.id, fields }
}

impl From<RawRecord> for CanonicalRecord {
    fn from(raw: RawRecord) -> Self {
        translate(raw)
    }
}
