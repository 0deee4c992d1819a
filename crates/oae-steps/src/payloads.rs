//! Request bodies for document creation and privatisation.
//!
//! The server takes several of its parameters as JSON strings embedded in
//! form fields. They are built here with `serde_json::json!` rather than
//! by string formatting.

use oae_client::Form;
use oae_core::PoolId;
use serde_json::json;

/// Id of the single row every new document page is created with.
pub const ROW_ID: &str = "id14318149";

/// Page id and title of a new sakai document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentIds {
    /// Page id, `id{n}`
    pub id: String,
    /// Document title, `document_{n}`
    pub title: String,
}

impl DocumentIds {
    /// Derives ids from a number.
    #[must_use]
    pub fn from_number(n: u32) -> Self {
        Self {
            id: format!("id{n}"),
            title: format!("document_{n}"),
        }
    }

    /// Picks a random number below 10 000 000.
    #[must_use]
    pub fn random() -> Self {
        Self::from_number(rand::random_range(0..10_000_000))
    }
}

/// Page structure of a one-page document.
#[must_use]
pub fn structure0(id: &str, title: &str) -> String {
    json!({
        "page1": {
            "_ref": id,
            "_order": 0,
            "_title": title,
            "main": {
                "_ref": id,
                "_order": 0,
                "_title": title,
            }
        }
    })
    .to_string()
}

/// Row and column layout imported into a new page.
#[must_use]
pub fn import_content(id: &str) -> String {
    json!({
        id: {
            "rows": {
                "__array__0__": {
                    "id": ROW_ID,
                    "columns": {
                        "__array__0__": {
                            "width": 1,
                            "elements": "",
                        }
                    }
                }
            }
        }
    })
    .to_string()
}

/// Empty page content matching the imported layout.
#[must_use]
pub fn page_content() -> String {
    json!({
        "rows": [{
            "id": ROW_ID,
            "columns": [{ "width": 1, "elements": [] }],
        }]
    })
    .to_string()
}

/// Batch that removes the public viewers of an item and denies them read access.
#[must_use]
pub fn privatise_batch(pool_id: &PoolId) -> String {
    let path = pool_id.content_path();
    json!([
        {
            "url": format!("{path}.members.html"),
            "method": "POST",
            "parameters": { ":viewer@Delete": ["anonymous", "everyone"] },
        },
        {
            "url": format!("{path}.modifyAce.html"),
            "method": "POST",
            "parameters": { "principalId": ["everyone"], "privilege@jcr:read": "denied" },
        },
        {
            "url": format!("{path}.modifyAce.html"),
            "method": "POST",
            "parameters": { "principalId": ["anonymous"], "privilege@jcr:read": "denied" },
        },
    ])
    .to_string()
}

/// Form creating a sakai document through `/system/pool/createfile`.
#[must_use]
pub fn document_form(ids: &DocumentIds) -> Form {
    Form::new()
        .field("structure0", structure0(&ids.id, &ids.title))
        .field("mimeType", "x-sakai/document")
        .field("sakai:schemaversion", 2)
        .field("_charset_", "utf-8")
}

/// Form importing the page layout into `/p/{poolId}`.
#[must_use]
pub fn import_form(id: &str) -> Form {
    Form::new()
        .field(":operation", "import")
        .field(":contentType", "json")
        .field(":merge", true)
        .field(":replace", true)
        .field(":replaceProperties", true)
        .field("_charset_", "utf-8")
        .field(":content", import_content(id))
}

/// Form saving the page content.
#[must_use]
pub fn page_content_form() -> Form {
    Form::new()
        .field("sling:resourceType", "sakai/pagecontent")
        .field("sakai:pagecontent", page_content())
        .field("_charset_", "utf-8")
}

/// Form posted to `/system/batch`.
#[must_use]
pub fn privatise_form(pool_id: &PoolId) -> Form {
    Form::new()
        .field("requests", privatise_batch(pool_id))
        .field("_charset_", "utf-8")
}

/// Metadata marking an item private under its title.
#[must_use]
pub fn private_metadata(title: &str) -> Form {
    Form::new()
        .field("sakai:pooled-content-file-name", title)
        .field("sakai:description", "")
        .field("sakai:permissions", "private")
        .field("sakai:copyright", "creativecommons")
        .field("sakai:allowcomments", true)
        .field("sakai:showcomments", true)
        .field("_charset_", "utf-8")
}

/// Form tagging an item.
#[must_use]
pub fn tag_form(tag: &str) -> Form {
    Form::new()
        .field(":operation", "tag")
        .field("key", format!("/tags/{tag}"))
        .field("_charset_", "utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn test_document_ids() {
        let ids = DocumentIds::from_number(1234);
        assert_eq!(ids.id, "id1234");
        assert_eq!(ids.title, "document_1234");

        let random = DocumentIds::random();
        let n: u32 = random.id.trim_start_matches("id").parse().unwrap();
        assert!(n < 10_000_000);
        assert_eq!(random.title, format!("document_{n}"));
    }

    #[test]
    fn test_structure0_references_page() {
        let value = parse(&structure0("id7", "document_7"));
        assert_eq!(value["page1"]["_ref"], "id7");
        assert_eq!(value["page1"]["_title"], "document_7");
        assert_eq!(value["page1"]["main"]["_order"], 0);
    }

    #[test]
    fn test_import_content_keyed_by_page() {
        let value = parse(&import_content("id7"));
        let row = &value["id7"]["rows"]["__array__0__"];
        assert_eq!(row["id"], ROW_ID);
        assert_eq!(row["columns"]["__array__0__"]["width"], 1);
        assert_eq!(row["columns"]["__array__0__"]["elements"], "");
    }

    #[test]
    fn test_page_content_matches_layout() {
        let value = parse(&page_content());
        assert_eq!(value["rows"][0]["id"], ROW_ID);
        assert!(value["rows"][0]["columns"][0]["elements"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_privatise_batch() {
        let id = PoolId::new("abc").unwrap();
        let value = parse(&privatise_batch(&id));
        let requests = value.as_array().unwrap();

        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0]["url"], "/p/abc.members.html");
        assert_eq!(
            requests[0]["parameters"][":viewer@Delete"],
            json!(["anonymous", "everyone"])
        );
        assert_eq!(requests[1]["url"], "/p/abc.modifyAce.html");
        assert_eq!(requests[1]["parameters"]["principalId"], json!(["everyone"]));
        assert_eq!(requests[2]["parameters"]["principalId"], json!(["anonymous"]));
        assert!(
            requests[1..]
                .iter()
                .all(|r| r["parameters"]["privilege@jcr:read"] == "denied")
        );
    }

    #[test]
    fn test_private_metadata() {
        let form = private_metadata("notes-42");
        assert_eq!(form.get("sakai:pooled-content-file-name"), Some("notes-42"));
        assert_eq!(form.get("sakai:permissions"), Some("private"));
        assert_eq!(form.get("sakai:description"), Some(""));
        assert_eq!(form.get("sakai:allowcomments"), Some("true"));
    }

    #[test]
    fn test_tag_form() {
        assert_eq!(tag_form("physics-42").get("key"), Some("/tags/physics-42"));
    }
}
