//! Schema-driven record creation.
//!
//! # Design
//! `FormKind` selects an ordered list of `FieldDescriptor`s; validation,
//! rendering and payload building all walk that list instead of branching
//! on the kind. Foreign-key fields name the collection their options come
//! from, and `CreateForm::load_options` drains those collections before the
//! form accepts a submit.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::ZooClient;
use crate::drain::{drain_ids, CancelToken};
use crate::error::ApiError;
use crate::http::Transport;
use crate::notice::Notice;
use crate::resource::Resource;
use crate::style::{Accent, StyleSheet};
use crate::types::{record_id, Record};
use crate::validate;

/// IUCN Red List categories.
pub const CONSERVATION_STATUSES: &[&str] = &["LC", "NT", "VU", "EN", "CR", "EW", "EX", "DD"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// `<PREFIX>-###` of the given collection.
    Id(Resource),
    /// Free text, length in characters. `min == 0` makes the field optional.
    Text { min: usize, max: usize },
    /// Letters and spaces only.
    Letters { min: usize, max: usize },
    /// Unsigned integer with between `min` and `max` digits. Sent as a number.
    Digits { min: usize, max: usize },
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub rule: FieldRule,
    /// Collection whose IDs populate this field's dropdown.
    pub source: Option<Resource>,
}

impl FieldDescriptor {
    const fn new(name: &'static str, label: &'static str, rule: FieldRule) -> Self {
        Self {
            name,
            label,
            rule,
            source: None,
        }
    }

    const fn select(name: &'static str, label: &'static str, source: Resource) -> Self {
        Self {
            name,
            label,
            rule: FieldRule::Id(source),
            source: Some(source),
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self.rule, FieldRule::Text { min: 0, .. })
    }

    /// Check one raw value. `options` is the dropdown list for select fields.
    pub fn check(&self, raw: &str, options: Option<&[String]>) -> Result<(), String> {
        let value = raw.trim();
        if value.is_empty() {
            return if self.is_required() {
                Err(format!("{} is required.", self.label))
            } else {
                Ok(())
            };
        }
        let len = value.chars().count();
        match self.rule {
            FieldRule::Id(resource) => {
                validate::resource_id(resource, value).map_err(|_| {
                    format!(
                        "{} must look like {}-001.",
                        self.label,
                        resource.id_prefix()
                    )
                })?;
                if let (Some(_), Some(options)) = (self.source, options) {
                    if !options.iter().any(|o| o == value) {
                        return Err(format!("Pick an existing {}.", resource.singular()));
                    }
                }
                Ok(())
            }
            FieldRule::Text { min, max } => {
                if len < min.max(1) || len > max {
                    Err(format!(
                        "{} must be between {} and {} characters.",
                        self.label,
                        min.max(1),
                        max
                    ))
                } else {
                    Ok(())
                }
            }
            FieldRule::Letters { min, max } => {
                if !value.chars().all(|c| c.is_alphabetic() || c == ' ') {
                    Err(format!("{} may contain only letters and spaces.", self.label))
                } else if len < min || len > max {
                    Err(format!(
                        "{} must be between {} and {} characters.",
                        self.label, min, max
                    ))
                } else {
                    Ok(())
                }
            }
            FieldRule::Digits { min, max } => {
                if !value.chars().all(|c| c.is_ascii_digit()) || len < min || len > max {
                    Err(format!(
                        "{} must be a whole number of up to {} digits.",
                        self.label, max
                    ))
                } else {
                    Ok(())
                }
            }
            FieldRule::OneOf(allowed) => {
                if allowed.contains(&value) {
                    Ok(())
                } else {
                    Err(format!("{} must be one of {}.", self.label, allowed.join(", ")))
                }
            }
        }
    }

    fn to_json(&self, value: &str) -> Value {
        match self.rule {
            FieldRule::Digits { .. } => value
                .parse::<u64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::from(value)),
            _ => Value::from(value),
        }
    }
}

const HABITAT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("habitat_id", "Habitat ID", FieldRule::Id(Resource::Habitats)),
    FieldDescriptor::new("name", "Name", FieldRule::Text { min: 2, max: 50 }),
    FieldDescriptor::new("climate", "Climate", FieldRule::Text { min: 2, max: 30 }),
    FieldDescriptor::new("vegetation", "Vegetation", FieldRule::Text { min: 2, max: 50 }),
    FieldDescriptor::new("region", "Region", FieldRule::Text { min: 2, max: 50 }),
    FieldDescriptor::new("area_km2", "Area (km²)", FieldRule::Digits { min: 1, max: 9 }),
    FieldDescriptor::new("description", "Description", FieldRule::Text { min: 0, max: 255 }),
];

const SPECIES_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("species_id", "Species ID", FieldRule::Id(Resource::Species)),
    FieldDescriptor::new("name", "Common name", FieldRule::Text { min: 2, max: 50 }),
    FieldDescriptor::new(
        "scientific_name",
        "Scientific name",
        FieldRule::Letters { min: 2, max: 80 },
    ),
    FieldDescriptor::new(
        "conservation_status",
        "Conservation status",
        FieldRule::OneOf(CONSERVATION_STATUSES),
    ),
    FieldDescriptor::new("lifespan_years", "Lifespan (years)", FieldRule::Digits { min: 1, max: 3 }),
    FieldDescriptor::new("weight_kg", "Weight (kg)", FieldRule::Digits { min: 1, max: 6 }),
    FieldDescriptor::new("population", "Population", FieldRule::Digits { min: 1, max: 10 }),
    FieldDescriptor::new("description", "Description", FieldRule::Text { min: 0, max: 255 }),
    FieldDescriptor::select("habitat_id", "Habitat", Resource::Habitats),
    FieldDescriptor::select("diet_id", "Diet", Resource::Diets),
    FieldDescriptor::select("classification_id", "Classification", Resource::Classifications),
    FieldDescriptor::new("keeper_notes", "Keeper notes", FieldRule::Text { min: 0, max: 255 }),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Habitat,
    Species,
}

impl FormKind {
    pub fn resource(self) -> Resource {
        match self {
            FormKind::Habitat => Resource::Habitats,
            FormKind::Species => Resource::Species,
        }
    }

    pub fn fields(self) -> &'static [FieldDescriptor] {
        match self {
            FormKind::Habitat => HABITAT_FIELDS,
            FormKind::Species => SPECIES_FIELDS,
        }
    }

    pub fn field(self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            FormKind::Habitat => "Habitat",
            FormKind::Species => "Species",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FormKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Resource>()? {
            Resource::Habitats => Ok(FormKind::Habitat),
            Resource::Species => Ok(FormKind::Species),
            other => Err(format!("records of type {other} cannot be created here")),
        }
    }
}

/// Raw field values as typed, keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRecord {
    pub kind: FormKind,
    pub fields: BTreeMap<&'static str, String>,
}

impl FormRecord {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            fields: kind.fields().iter().map(|f| (f.name, String::new())).collect(),
        }
    }

    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// JSON payload: trimmed values, blank optional fields left out.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        for field in self.kind.fields() {
            let value = self.get(field.name).trim();
            if value.is_empty() {
                continue;
            }
            record.insert(field.name.to_string(), field.to_json(value));
        }
        record
    }
}

/// Field name → message. Recomputed wholesale on each validation pass.
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; nothing was sent.
    Invalid,
    /// Foreign-key options are not loaded yet.
    NotReady,
    Created { id: String },
    Duplicate { id: String },
    Failed,
}

pub struct CreateForm {
    record: FormRecord,
    errors: FieldErrors,
    options: BTreeMap<&'static str, Vec<String>>,
    notice: Option<Notice>,
    cancel: CancelToken,
}

impl CreateForm {
    pub fn new(kind: FormKind) -> Self {
        Self {
            record: FormRecord::new(kind),
            errors: FieldErrors::new(),
            options: BTreeMap::new(),
            notice: None,
            cancel: CancelToken::new(),
        }
    }

    pub fn kind(&self) -> FormKind {
        self.record.kind
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn options(&self, field: &str) -> Option<&[String]> {
        self.options.get(field).map(Vec::as_slice)
    }

    /// Token shared with in-flight option loads.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn style(&self) -> StyleSheet {
        StyleSheet {
            view: "create",
            accent: Accent::Green,
            compact: false,
        }
    }

    /// Switch resource type: everything typed so far is discarded and any
    /// option load still running is cancelled.
    pub fn switch_kind(&mut self, kind: FormKind) {
        if kind == self.record.kind {
            return;
        }
        self.cancel.cancel();
        *self = Self::new(kind);
    }

    /// Set one field. Clears that field's error. Unknown names are ignored
    /// and reported as `false`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.kind().field(name) {
            Some(field) => {
                self.record.fields.insert(field.name, value.into());
                self.errors.remove(field.name);
                true
            }
            None => false,
        }
    }

    /// Whether every dropdown has been populated.
    pub fn is_ready(&self) -> bool {
        self.kind()
            .fields()
            .iter()
            .filter(|f| f.source.is_some())
            .all(|f| self.options.contains_key(f.name))
    }

    /// Drain every foreign-key collection this form references.
    pub fn load_options<T: Transport>(&mut self, transport: &T, client: &ZooClient) -> Result<(), ApiError> {
        for field in self.kind().fields() {
            let Some(source) = field.source else { continue };
            match drain_ids(transport, client, source, &self.cancel) {
                Ok(ids) => {
                    debug!(field = field.name, count = ids.len(), "options loaded");
                    self.options.insert(field.name, ids);
                }
                Err(err) => {
                    warn!(field = field.name, error = %err, "option load failed");
                    self.notice = Some(Notice::error(format!(
                        "Could not load {} options. {}",
                        source.singular(),
                        err.user_message()
                    )));
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Validate every field; all errors are kept, not just the first.
    pub fn validate(&mut self) -> bool {
        let mut errors = FieldErrors::new();
        for field in self.kind().fields() {
            let options = self.options.get(field.name).map(Vec::as_slice);
            if let Err(message) = field.check(self.record.get(field.name), options) {
                errors.insert(field.name, message);
            }
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    pub fn submit<T: Transport>(&mut self, transport: &T, client: &ZooClient) -> SubmitOutcome {
        if !self.is_ready() {
            self.notice = Some(Notice::warning("Options are still loading."));
            return SubmitOutcome::NotReady;
        }
        if !self.validate() {
            self.notice = Some(Notice::warning(format!(
                "Fix the {} highlighted field(s).",
                self.errors.len()
            )));
            return SubmitOutcome::Invalid;
        }

        let kind = self.kind();
        let payload = self.record.to_record();
        let id = record_id(&payload, kind.resource()).unwrap_or_default();
        let result = client
            .build_create(kind.resource(), &payload)
            .and_then(|request| transport.execute(&request))
            .and_then(|response| client.parse_create(response));

        match result {
            Ok(_) => {
                info!(%id, kind = %kind, "record created");
                self.notice = Some(Notice::success(format!("{kind} {id} created.")));
                self.record = FormRecord::new(kind);
                self.errors.clear();
                SubmitOutcome::Created { id }
            }
            Err(ApiError::Duplicate { id: dup }) => {
                let id = if dup.is_empty() { id } else { dup };
                self.notice = Some(Notice::error(format!(
                    "{kind} {id} already exists. Choose a different ID."
                )));
                SubmitOutcome::Duplicate { id }
            }
            Err(err) => {
                warn!(error = %err, kind = %kind, "create failed");
                self.notice = Some(Notice::error(format!(
                    "Could not create {}. {}",
                    kind.resource().singular(),
                    err.user_message()
                )));
                SubmitOutcome::Failed
            }
        }
    }
}

impl Drop for CreateForm {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drain::testing::{id_page, ScriptedTransport};
    use crate::notice::Level;

    fn client() -> ZooClient {
        ZooClient::new("http://api.test")
    }

    fn fill_habitat(form: &mut CreateForm) {
        form.set("habitat_id", "HA-001");
        form.set("name", "Savannah");
        form.set("climate", "Tropical");
        form.set("vegetation", "Grassland");
        form.set("region", "East Africa");
        form.set("area_km2", "12000");
    }

    #[test]
    fn schemas_have_expected_sizes() {
        assert_eq!(FormKind::Habitat.fields().len(), 7);
        assert_eq!(FormKind::Species.fields().len(), 12);
        let selects: Vec<_> = FormKind::Species
            .fields()
            .iter()
            .filter_map(|f| f.source)
            .collect();
        assert_eq!(
            selects,
            vec![Resource::Habitats, Resource::Diets, Resource::Classifications]
        );
    }

    #[test]
    fn all_errors_reported_at_once() {
        let mut form = CreateForm::new(FormKind::Habitat);
        form.set("habitat_id", "HAB-1");
        form.set("area_km2", "12k");
        assert!(!form.validate());
        let errors = form.errors();
        assert!(errors.contains_key("habitat_id"));
        assert!(errors.contains_key("area_km2"));
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("climate"));
        assert!(!errors.contains_key("description"));
        assert_eq!(errors["habitat_id"], "Habitat ID must look like HA-001.");
    }

    #[test]
    fn editing_clears_only_that_error() {
        let mut form = CreateForm::new(FormKind::Habitat);
        form.validate();
        let before = form.errors().len();
        form.set("name", "Wetland");
        assert!(!form.errors().contains_key("name"));
        assert_eq!(form.errors().len(), before - 1);
    }

    #[test]
    fn species_rules() {
        let status = FormKind::Species.field("conservation_status").unwrap();
        assert!(status.check("EN", None).is_ok());
        assert!(status.check("Endangered", None).is_err());
        let sci = FormKind::Species.field("scientific_name").unwrap();
        assert!(sci.check("Panthera leo", None).is_ok());
        assert!(sci.check("Panthera l30", None).is_err());
        let habitat = FormKind::Species.field("habitat_id").unwrap();
        let opts = vec!["HA-001".to_string()];
        assert!(habitat.check("HA-001", Some(opts.as_slice())).is_ok());
        assert_eq!(
            habitat.check("HA-002", Some(opts.as_slice())).unwrap_err(),
            "Pick an existing habitat."
        );
    }

    #[test]
    fn payload_types_numbers_and_skips_blanks() {
        let mut form = CreateForm::new(FormKind::Habitat);
        fill_habitat(&mut form);
        let record = form.record().to_record();
        assert_eq!(record["area_km2"], 12000);
        assert_eq!(record["name"], "Savannah");
        assert!(!record.contains_key("description"));
    }

    #[test]
    fn switching_kind_clears_form() {
        let mut form = CreateForm::new(FormKind::Habitat);
        form.set("name", "Savannah");
        let token = form.cancel_token();
        form.switch_kind(FormKind::Species);
        assert_eq!(form.kind(), FormKind::Species);
        assert_eq!(form.record().get("name"), "");
        assert!(token.is_cancelled());
        assert!(!form.cancel_token().is_cancelled());
    }

    #[test]
    fn habitat_submit_success_clears() {
        let transport = ScriptedTransport::new().respond(201, r#"[{"habitat_id":"HA-001"}]"#);
        let mut form = CreateForm::new(FormKind::Habitat);
        fill_habitat(&mut form);
        let outcome = form.submit(&transport, &client());
        assert_eq!(outcome, SubmitOutcome::Created { id: "HA-001".into() });
        assert_eq!(form.notice().unwrap().level, Level::Success);
        assert_eq!(form.record().get("name"), "");
        let sent = transport.requests.borrow()[0].clone();
        assert_eq!(sent.url, "http://api.test/habitats");
    }

    #[test]
    fn duplicate_is_distinct_from_generic_failure() {
        let transport = ScriptedTransport::new()
            .respond(409, r#"{"code":23000,"id":"HA-001"}"#)
            .respond(500, r#"{"message":"database offline"}"#);
        let mut form = CreateForm::new(FormKind::Habitat);
        fill_habitat(&mut form);

        let outcome = form.submit(&transport, &client());
        assert_eq!(outcome, SubmitOutcome::Duplicate { id: "HA-001".into() });
        let dup = form.notice().unwrap().message.clone();
        assert!(dup.contains("HA-001 already exists"));
        // form keeps its values after a rejection
        assert_eq!(form.record().get("name"), "Savannah");

        let outcome = form.submit(&transport, &client());
        assert_eq!(outcome, SubmitOutcome::Failed);
        let generic = form.notice().unwrap().message.clone();
        assert!(generic.contains("database offline"));
        assert!(!generic.contains("already exists"));
    }

    #[test]
    fn invalid_form_sends_nothing() {
        let transport = ScriptedTransport::new();
        let mut form = CreateForm::new(FormKind::Habitat);
        assert_eq!(form.submit(&transport, &client()), SubmitOutcome::Invalid);
        assert!(transport.requests.borrow().is_empty());
    }

    #[test]
    fn species_needs_options_before_submit() {
        let transport = ScriptedTransport::new();
        let mut form = CreateForm::new(FormKind::Species);
        assert!(!form.is_ready());
        assert_eq!(form.submit(&transport, &client()), SubmitOutcome::NotReady);
    }

    #[test]
    fn species_options_drain_every_source() {
        let transport = ScriptedTransport::new()
            .respond(200, id_page("habitat_id", "HA", 1, 20, 2))
            .respond(200, id_page("habitat_id", "HA", 21, 3, 2))
            .respond(200, id_page("diet_id", "DI", 1, 3, 1))
            .respond(200, id_page("classification_id", "CL", 1, 4, 1));
        let mut form = CreateForm::new(FormKind::Species);
        form.load_options(&transport, &client()).unwrap();
        assert!(form.is_ready());
        assert_eq!(form.options("habitat_id").unwrap().len(), 23);
        assert_eq!(form.options("diet_id").unwrap().len(), 3);
        assert_eq!(form.options("classification_id").unwrap().len(), 4);
    }

    #[test]
    fn option_failure_is_a_notice() {
        let transport = ScriptedTransport::new().fail("refused");
        let mut form = CreateForm::new(FormKind::Species);
        assert!(form.load_options(&transport, &client()).is_err());
        assert!(!form.is_ready());
        assert_eq!(form.notice().unwrap().level, Level::Error);
    }

    #[test]
    fn kind_parses_from_resource_names() {
        assert_eq!("habitats".parse::<FormKind>().unwrap(), FormKind::Habitat);
        assert!("diets".parse::<FormKind>().is_err());
    }
}
