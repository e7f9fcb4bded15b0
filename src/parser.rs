//! Reader for legislator documents returned by the Congress open-data service.
//!
//! Two shapes are accepted: the raw XML answer of the web service and the JSON
//! that generic XML→JSON converters make of it. The converters turn a repeated
//! element into an array but a lone one into a plain object, so the membership
//! field is normalized here into a single `Vec` before anything else sees it.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use roxmltree::{Document, Node};
use serde::Deserialize;
use thiserror::Error;

use crate::ir::{
    INDEPENDENT_PARTY_ID, INDEPENDENT_PARTY_NAME, Legislator, OPEN_END, PartyMembershipInterval,
};

const LEGISLATOR_TAGS: [&str; 3] = ["Diputado", "Senador", "Parlamentario"];

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing <{element}> in <{parent}>")]
    MissingElement {
        element: &'static str,
        parent: String,
    },
    #[error("invalid date {value:?} in {field}")]
    InvalidDate { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, FeedError>;

pub fn parse_feed(input: &str) -> Result<Vec<Legislator>> {
    let input = input.trim_start_matches('\u{feff}').trim_start();
    let legislators = if input.starts_with('<') {
        parse_xml_feed(input)?
    } else {
        parse_json_feed(input)?
    };
    tracing::debug!(count = legislators.len(), "parsed legislator feed");
    Ok(legislators)
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]` and bare dates.
pub fn parse_feed_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn start_date(value: Option<&str>, parent: &str) -> Result<NaiveDateTime> {
    let value = value.ok_or_else(|| FeedError::MissingElement {
        element: "FechaInicio",
        parent: parent.to_string(),
    })?;
    parse_feed_date(value).ok_or_else(|| FeedError::InvalidDate {
        field: "FechaInicio",
        value: value.to_string(),
    })
}

fn end_date(value: Option<&str>) -> Result<NaiveDateTime> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(OPEN_END),
        Some(value) => parse_feed_date(value).ok_or_else(|| FeedError::InvalidDate {
            field: "FechaTermino",
            value: value.to_string(),
        }),
    }
}

fn membership(
    legislator_id: &str,
    party_alias: Option<String>,
    party_id: Option<String>,
    party_name: Option<String>,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> PartyMembershipInterval {
    match party_alias.or(party_id) {
        Some(id) => {
            let name = party_name.unwrap_or_else(|| id.clone());
            PartyMembershipInterval::new(id, name, start, end)
        }
        None => {
            tracing::warn!(
                legislator = %legislator_id,
                "membership without party, treating as independent"
            );
            PartyMembershipInterval::new(INDEPENDENT_PARTY_ID, INDEPENDENT_PARTY_NAME, start, end)
        }
    }
}

// ---------------------------------------------------------------------------
// XML
// ---------------------------------------------------------------------------

fn parse_xml_feed(input: &str) -> Result<Vec<Legislator>> {
    let doc = Document::parse(input)?;
    doc.descendants()
        .filter(|node| node.is_element() && LEGISLATOR_TAGS.contains(&node.tag_name().name()))
        .map(|node| parse_legislator_node(&node))
        .collect()
}

fn child<'a, 'input>(node: &Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn own_text(node: &Node) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn child_text(node: &Node, name: &str) -> Option<String> {
    child(node, name).and_then(|n| own_text(&n))
}

/// Text of `<Tag>value</Tag>` or of its `Nombre`/`Numero` child.
fn label_text(node: &Node) -> Option<String> {
    own_text(node)
        .or_else(|| child_text(node, "Nombre"))
        .or_else(|| child_text(node, "Numero"))
}

fn parse_legislator_node(node: &Node) -> Result<Legislator> {
    let tag = node.tag_name().name();
    let id = child_text(node, "Id").ok_or_else(|| FeedError::MissingElement {
        element: "Id",
        parent: tag.to_string(),
    })?;

    let given_names = [child_text(node, "Nombre"), child_text(node, "Nombre2")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    let mut memberships = Vec::new();
    for militancia in node
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "Militancia")
    {
        let start = start_date(child_text(&militancia, "FechaInicio").as_deref(), "Militancia")?;
        let end = end_date(child_text(&militancia, "FechaTermino").as_deref())?;
        let partido = child(&militancia, "Partido");
        let alias = partido.and_then(|p| child_text(&p, "Alias"));
        let party_id = partido.and_then(|p| child_text(&p, "Id"));
        let party_name = partido.and_then(|p| child_text(&p, "Nombre"));
        memberships.push(membership(&id, alias, party_id, party_name, start, end));
    }

    // The period wrapper (`DiputadoPeriodo`) carries the district next to the person.
    let district = child(node, "Distrito")
        .or_else(|| node.parent_element().and_then(|p| child(&p, "Distrito")))
        .and_then(|n| label_text(&n));
    let region = child(node, "Region")
        .or_else(|| node.parent_element().and_then(|p| child(&p, "Region")))
        .and_then(|n| label_text(&n));
    let email = child_text(node, "Email").or_else(|| child_text(node, "CorreoElectronico"));

    Ok(Legislator {
        id,
        given_names,
        paternal_surname: child_text(node, "ApellidoPaterno").unwrap_or_default(),
        maternal_surname: child_text(node, "ApellidoMaterno").unwrap_or_default(),
        memberships,
        region,
        district,
        email,
    })
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// Ids come through as strings or numbers depending on the converter.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(text) => text.trim().to_string(),
            Scalar::Integer(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MembershipField {
    Direct(OneOrMany<MembershipJson>),
    Wrapped {
        #[serde(alias = "Militancia")]
        militancia: Option<OneOrMany<MembershipJson>>,
    },
}

impl MembershipField {
    fn into_vec(self) -> Vec<MembershipJson> {
        match self {
            MembershipField::Direct(items) => items.into_vec(),
            MembershipField::Wrapped { militancia } => {
                militancia.map(OneOrMany::into_vec).unwrap_or_default()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MembershipJson {
    #[serde(alias = "FechaInicio", alias = "start")]
    fecha_inicio: String,
    #[serde(default, alias = "FechaTermino", alias = "end")]
    fecha_termino: Option<String>,
    #[serde(default, alias = "Partido", alias = "party")]
    partido: Option<PartyJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartyJson {
    #[serde(default, alias = "Id")]
    id: Option<Scalar>,
    #[serde(default, alias = "Alias")]
    alias: Option<String>,
    #[serde(default, alias = "Nombre", alias = "name")]
    nombre: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegislatorJson {
    #[serde(alias = "Id")]
    id: Scalar,
    #[serde(default, alias = "Nombre")]
    nombre: Option<String>,
    #[serde(default, alias = "Nombre2")]
    nombre2: Option<String>,
    #[serde(default, alias = "ApellidoPaterno")]
    apellido_paterno: Option<String>,
    #[serde(default, alias = "ApellidoMaterno")]
    apellido_materno: Option<String>,
    #[serde(default, alias = "Militancias", alias = "memberships")]
    militancias: Option<MembershipField>,
    #[serde(default, alias = "Region")]
    region: Option<Scalar>,
    #[serde(default, alias = "Distrito")]
    distrito: Option<Scalar>,
    #[serde(default, alias = "Email", alias = "correoElectronico")]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedJson {
    List(Vec<LegislatorJson>),
    Wrapped {
        #[serde(alias = "diputados", alias = "senadores")]
        legislators: OneOrMany<LegislatorJson>,
    },
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_json_feed(input: &str) -> Result<Vec<Legislator>> {
    let records = match serde_json::from_str::<FeedJson>(input)? {
        FeedJson::List(records) => records,
        FeedJson::Wrapped { legislators } => legislators.into_vec(),
    };
    records.into_iter().map(legislator_from_json).collect()
}

fn legislator_from_json(record: LegislatorJson) -> Result<Legislator> {
    let id = record.id.into_string();
    let mut memberships = Vec::new();
    for raw in record
        .militancias
        .map(MembershipField::into_vec)
        .unwrap_or_default()
    {
        let start = start_date(Some(raw.fecha_inicio.as_str()), "militancia")?;
        let end = end_date(raw.fecha_termino.as_deref())?;
        let (alias, party_id, party_name) = match raw.partido {
            Some(party) => (
                non_blank(party.alias),
                non_blank(party.id.map(Scalar::into_string)),
                non_blank(party.nombre),
            ),
            None => (None, None, None),
        };
        memberships.push(membership(&id, alias, party_id, party_name, start, end));
    }

    let given_names = [non_blank(record.nombre), non_blank(record.nombre2)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Legislator {
        id,
        given_names,
        paternal_surname: non_blank(record.apellido_paterno).unwrap_or_default(),
        maternal_surname: non_blank(record.apellido_materno).unwrap_or_default(),
        memberships,
        region: non_blank(record.region.map(Scalar::into_string)),
        district: non_blank(record.distrito.map(Scalar::into_string)),
        email: non_blank(record.email),
    })
}
