use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::contributor::{self, CrossrefXmlContributor, map_contributors};
use crate::date::from_date_parts;
use crate::identifier::issn::{IssnCandidate, pick_issn};
use crate::identifier::{doi::normalize_doi, normalize_url};
use crate::reader::sanitize;
use crate::record::{
    Container, Description, NormalizedRecord, Publisher, RecordDate, State, Title, WorkType,
};

/// The fields pulled out of a Crossref deposit (`doi_record`) document.
#[derive(Debug, Default)]
struct CrossrefXmlWork {
    work_element: Option<String>,
    doi: Option<String>,
    resource: Option<String>,
    titles: Vec<String>,
    contributors: Vec<CrossrefXmlContributor>,
    year: Option<i32>,
    month: Option<i32>,
    day: Option<i32>,
    journal_title: Option<String>,
    issns: Vec<IssnCandidate>,
    publisher_name: Option<String>,
    abstract_text: Option<String>,
}

fn is_local(name: &[u8], target: &str) -> bool {
    // Compare local name ignoring namespace prefixes.
    if let Some(pos) = name.iter().rposition(|&b| b == b':') {
        &name[pos + 1..] == target.as_bytes()
    } else {
        name == target.as_bytes()
    }
}

fn get_attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .map(|a| String::from_utf8_lossy(a.value.as_ref()).to_string())
}

const WORK_ELEMENTS: &[&str] = &[
    "journal_article",
    "posted_content",
    "book_metadata",
    "content_item",
    "conference_paper",
    "dissertation",
    "report-paper_metadata",
    "database_metadata",
];

fn work_type(element: Option<&str>) -> WorkType {
    match element {
        Some("journal_article") => WorkType::JournalArticle,
        Some("posted_content") => WorkType::Article,
        Some("book_metadata") => WorkType::Book,
        Some("content_item") | Some("conference_paper") => WorkType::BookChapter,
        Some("dissertation") => WorkType::Dissertation,
        Some("report-paper_metadata") => WorkType::Report,
        Some("database_metadata") => WorkType::Dataset,
        _ => WorkType::Document,
    }
}

fn scan(xml: &str) -> anyhow::Result<CrossrefXmlWork> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut work = CrossrefXmlWork::default();
    let mut cur_text = String::new();
    let mut in_person = false;
    let mut in_publication_date = false;
    let mut in_journal_metadata = false;
    let mut in_publisher = false;
    let mut issn_media_type: Option<String> = None;
    let mut person = CrossrefXmlContributor::default();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let name = e.name();
                let name = name.as_ref();
                if let Some(element) = WORK_ELEMENTS.iter().find(|el| is_local(name, el)) {
                    work.work_element.get_or_insert((*element).to_string());
                } else if is_local(name, "person_name") {
                    in_person = true;
                    person = CrossrefXmlContributor {
                        contributor_role: get_attr_value(&e, b"contributor_role"),
                        ..Default::default()
                    };
                } else if is_local(name, "organization") {
                    person = CrossrefXmlContributor {
                        contributor_role: get_attr_value(&e, b"contributor_role"),
                        ..Default::default()
                    };
                } else if is_local(name, "publication_date") || is_local(name, "posted_date") {
                    in_publication_date = true;
                } else if is_local(name, "journal_metadata") {
                    in_journal_metadata = true;
                } else if in_journal_metadata && is_local(name, "issn") {
                    issn_media_type = get_attr_value(&e, b"media_type");
                } else if is_local(name, "publisher") {
                    in_publisher = true;
                }
                cur_text.clear();
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                let name = name.as_ref();
                let text = cur_text.trim();
                if is_local(name, "person_name") {
                    in_person = false;
                    work.contributors.push(std::mem::take(&mut person));
                } else if is_local(name, "organization") {
                    person.name = Some(text.to_string());
                    work.contributors.push(std::mem::take(&mut person));
                } else if in_person && is_local(name, "given_name") {
                    person.given_name = Some(text.to_string());
                } else if in_person && is_local(name, "surname") {
                    person.surname = Some(text.to_string());
                } else if in_person && is_local(name, "ORCID") {
                    person.orcid = Some(text.to_string());
                } else if is_local(name, "publication_date") || is_local(name, "posted_date") {
                    in_publication_date = false;
                } else if in_publication_date && is_local(name, "year") {
                    work.year = text.parse().ok();
                } else if in_publication_date && is_local(name, "month") {
                    work.month = text.parse().ok();
                } else if in_publication_date && is_local(name, "day") {
                    work.day = text.parse().ok();
                } else if is_local(name, "journal_metadata") {
                    in_journal_metadata = false;
                } else if in_journal_metadata && is_local(name, "full_title") {
                    work.journal_title = Some(text.to_string());
                } else if in_journal_metadata && is_local(name, "issn") {
                    work.issns.push(IssnCandidate {
                        media_type: issn_media_type.take(),
                        value: text.to_string(),
                    });
                } else if is_local(name, "publisher") {
                    in_publisher = false;
                } else if in_publisher && is_local(name, "publisher_name") {
                    work.publisher_name = Some(text.to_string());
                } else if is_local(name, "title") && !text.is_empty() {
                    work.titles.push(text.to_string());
                } else if is_local(name, "doi") && !text.is_empty() {
                    work.doi.get_or_insert_with(|| text.to_string());
                } else if is_local(name, "resource") && !text.is_empty() {
                    work.resource.get_or_insert_with(|| text.to_string());
                } else if is_local(name, "abstract") && !text.is_empty() {
                    work.abstract_text.get_or_insert_with(|| text.to_string());
                }
                cur_text.clear();
            }
            Ok(Event::Text(t)) => {
                cur_text.push_str(&String::from_utf8_lossy(t.as_ref()));
            }
            Ok(Event::CData(t)) => {
                cur_text.push_str(&String::from_utf8_lossy(t.as_ref()));
            }
            Err(e) => return Err(anyhow::anyhow!("XML parse error: {e}")),
            _ => {}
        }
        buf.clear();
    }

    Ok(work)
}

/// Read a Crossref deposit XML document into a normalized record.
pub fn read(string: &str) -> anyhow::Result<NormalizedRecord> {
    let work = scan(string)?;

    let Some(id) = work.doi.as_deref().and_then(normalize_doi) else {
        return Ok(NormalizedRecord::not_found());
    };

    let published = work
        .year
        .and_then(|y| from_date_parts(y, work.month.unwrap_or(0), work.day.unwrap_or(0)));

    let issn = pick_issn(&work.issns);
    let container = work.journal_title.map(|title| Container {
        container_type: Some("Journal".to_string()),
        title: Some(title),
        identifier: issn.clone(),
        identifier_type: issn.map(|_| "ISSN".to_string()),
    });

    Ok(NormalizedRecord {
        id,
        work_type: work_type(work.work_element.as_deref()),
        url: work
            .resource
            .as_deref()
            .and_then(|u| normalize_url(u, true, false)),
        contributors: map_contributors(contributor::from_crossref_xml(&work.contributors)),
        titles: work
            .titles
            .into_iter()
            .map(|t| Title {
                title: sanitize(&t),
                title_type: None,
            })
            .collect(),
        publisher: work.publisher_name.map(|name| Publisher { name }),
        date: RecordDate {
            published,
            ..Default::default()
        },
        license: None,
        descriptions: work
            .abstract_text
            .as_deref()
            .map(sanitize)
            .filter(|d| !d.is_empty())
            .map(|description| Description {
                description,
                description_type: Some("Abstract".to_string()),
            })
            .into_iter()
            .collect(),
        subjects: Vec::new(),
        language: None,
        alternate_identifiers: Vec::new(),
        related_identifiers: Vec::new(),
        references: Vec::new(),
        funding_references: Vec::new(),
        container,
        state: State::Findable,
        schema_version: None,
    })
}
