//! EAD document parser.
//!
//! Reads the collection identity from `eadid`/`titleproper` and the
//! descriptive hierarchy from `archdesc/dsc`, where every `c` element is a
//! unit carrying `did/unitid` and `did/unittitle` and possibly further `c`
//! children. Elements are matched on their local name, so namespaced and
//! prefixed documents parse the same way.

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use super::types::{FindingAid, FindingAidNode, NodeKind, NodePath};
use super::EadError;

/// Parse a finding-aid document into its tree.
pub fn parse_finding_aid(xml: &str) -> Result<FindingAid, EadError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().expand_empty_elements = true;

    let mut eadid: Option<String> = None;
    let mut titleproper: Option<String> = None;
    let mut children: Option<Vec<FindingAidNode>> = None;
    let mut seen_archdesc = false;
    // Local names of the open elements the top-level loop walked into.
    let mut open: Vec<Vec<u8>> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"eadid" && eadid.is_none() {
                    eadid = Some(read_text(&mut reader, "eadid")?);
                } else if name == b"titleproper" && titleproper.is_none() {
                    titleproper = Some(read_text(&mut reader, "titleproper")?);
                } else if name == b"dsc"
                    && children.is_none()
                    && open.last().is_some_and(|parent| parent == b"archdesc")
                {
                    children = Some(parse_units(&mut reader, &NodePath::root(), "dsc")?);
                } else {
                    if name == b"archdesc" {
                        seen_archdesc = true;
                    }
                    open.push(name);
                }
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let id = eadid
        .filter(|s| !s.is_empty())
        .ok_or(EadError::MissingField {
            field: "eadid",
            path: NodePath::root(),
        })?;
    let title = titleproper
        .filter(|s| !s.is_empty())
        .ok_or(EadError::MissingField {
            field: "titleproper",
            path: NodePath::root(),
        })?;
    if !seen_archdesc {
        return Err(EadError::MissingElement("archdesc"));
    }

    let children = children.unwrap_or_default();
    debug!(
        collection = %id,
        top_level = children.len(),
        "Parsed finding aid"
    );

    Ok(FindingAid {
        root: FindingAidNode::branch(id, title, NodePath::root(), children),
    })
}

/// Parse the `c` children of the element just opened, up to its end tag.
fn parse_units(
    reader: &mut Reader<&[u8]>,
    parent: &NodePath,
    element: &str,
) -> Result<Vec<FindingAidNode>, EadError> {
    let mut units = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if e.local_name().as_ref() == b"c" {
                    let path = parent.child(units.len() as u32 + 1);
                    units.push(parse_unit(reader, path)?);
                } else {
                    skip_element(reader, element)?;
                }
            }
            Event::End(_) => return Ok(units),
            Event::Eof => return Err(EadError::UnexpectedEof(element.to_string())),
            _ => {}
        }
    }
}

/// Parse one `c` element whose start tag was just read.
fn parse_unit(reader: &mut Reader<&[u8]>, path: NodePath) -> Result<FindingAidNode, EadError> {
    let mut unitid: Option<String> = None;
    let mut unittitle: Option<String> = None;
    let mut children = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"did" => read_did(reader, &mut unitid, &mut unittitle)?,
                b"c" => {
                    let child_path = path.child(children.len() as u32 + 1);
                    children.push(parse_unit(reader, child_path)?);
                }
                _ => skip_element(reader, "c")?,
            },
            Event::End(_) => break,
            Event::Eof => return Err(EadError::UnexpectedEof("c".to_string())),
            _ => {}
        }
    }

    let id = required(unitid, "unitid", &path)?;
    let title = required(unittitle, "unittitle", &path)?;
    let kind = if children.is_empty() {
        NodeKind::Leaf
    } else {
        NodeKind::Branch(children)
    };

    Ok(FindingAidNode {
        id,
        title,
        path,
        kind,
    })
}

/// Read `unitid` and `unittitle` from a `did` element. The first occurrence wins.
fn read_did(
    reader: &mut Reader<&[u8]>,
    unitid: &mut Option<String>,
    unittitle: &mut Option<String>,
) -> Result<(), EadError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"unitid" if unitid.is_none() => *unitid = Some(read_text(reader, "unitid")?),
                b"unittitle" if unittitle.is_none() => {
                    *unittitle = Some(read_text(reader, "unittitle")?)
                }
                _ => skip_element(reader, "did")?,
            },
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(EadError::UnexpectedEof("did".to_string())),
            _ => {}
        }
    }
}

/// Collect all descendant text of the element just opened, whitespace-normalized.
fn read_text(reader: &mut Reader<&[u8]>, element: &str) -> Result<String, EadError> {
    let mut raw = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Text(t) => raw.push_str(&t.unescape()?),
            Event::CData(t) => raw.push_str(&String::from_utf8_lossy(&t)),
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Event::Eof => return Err(EadError::UnexpectedEof(element.to_string())),
            _ => {}
        }
    }

    Ok(raw.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Consume the element just opened, including all of its content.
fn skip_element(reader: &mut Reader<&[u8]>, within: &str) -> Result<(), EadError> {
    let mut depth = 0usize;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    return Ok(());
                }
                depth -= 1;
            }
            Event::Eof => return Err(EadError::UnexpectedEof(within.to_string())),
            _ => {}
        }
    }
}

fn required(
    value: Option<String>,
    field: &'static str,
    path: &NodePath,
) -> Result<String, EadError> {
    value.filter(|s| !s.is_empty()).ok_or_else(|| EadError::MissingField {
        field,
        path: path.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_LEVELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ead>
  <eadheader>
    <eadid>5075</eadid>
    <filedesc>
      <titlestmt>
        <titleproper>Archief van de Notarissen</titleproper>
      </titlestmt>
    </filedesc>
  </eadheader>
  <archdesc level="fonds">
    <did><unittitle>Notarissen</unittitle></did>
    <dsc>
      <c level="series">
        <did><unitid>A</unitid><unittitle>Series A</unittitle></did>
        <c level="subseries">
          <did><unitid>A.1</unitid><unittitle>Subseries A.1</unittitle></did>
          <c level="file"><did><unitid>1</unitid><unittitle>File one</unittitle></did></c>
          <c level="file"><did><unitid>2</unitid><unittitle>File two</unittitle></did></c>
        </c>
        <c level="file"><did><unitid>3</unitid><unittitle>File three</unittitle></did></c>
      </c>
      <c level="file"><did><unitid>4</unitid><unittitle>File four</unittitle></did></c>
    </dsc>
  </archdesc>
</ead>"#;

    #[test]
    fn test_parse_root_identity() {
        let aid = parse_finding_aid(THREE_LEVELS).unwrap();
        assert_eq!(aid.collection_id(), "5075");
        assert_eq!(aid.title(), "Archief van de Notarissen");
        assert!(aid.root.path.is_root());
        assert!(!aid.root.is_leaf());
    }

    #[test]
    fn test_parse_assigns_positional_paths() {
        let aid = parse_finding_aid(THREE_LEVELS).unwrap();
        let top = aid.root.children();
        assert_eq!(top.len(), 2);

        let series = &top[0];
        assert_eq!(series.id, "A");
        assert_eq!(series.path.to_string(), "1");
        assert_eq!(series.children().len(), 2);

        let sub = &series.children()[0];
        assert_eq!(sub.path.to_string(), "1.1");
        assert_eq!(sub.children()[0].path.to_string(), "1.1.1");
        assert_eq!(sub.children()[1].path.to_string(), "1.1.2");
        assert_eq!(series.children()[1].path.to_string(), "1.2");
        assert_eq!(top[1].path.to_string(), "2");
    }

    #[test]
    fn test_parse_marks_leaves() {
        let aid = parse_finding_aid(THREE_LEVELS).unwrap();
        let top = aid.root.children();
        assert!(!top[0].is_leaf());
        assert!(top[0].children()[1].is_leaf());
        assert!(top[1].is_leaf());
        assert_eq!(top[1].title, "File four");
    }

    #[test]
    fn test_parse_namespaced_document() {
        let xml = r#"<ead:ead xmlns:ead="urn:isbn:1-931666-22-9">
  <ead:eadheader><ead:eadid>99</ead:eadid>
    <ead:filedesc><ead:titlestmt><ead:titleproper>Prefixed</ead:titleproper></ead:titlestmt></ead:filedesc>
  </ead:eadheader>
  <ead:archdesc><ead:dsc>
    <ead:c><ead:did><ead:unitid>7</ead:unitid><ead:unittitle>Seven</ead:unittitle></ead:did></ead:c>
  </ead:dsc></ead:archdesc>
</ead:ead>"#;
        let aid = parse_finding_aid(xml).unwrap();
        assert_eq!(aid.collection_id(), "99");
        assert_eq!(aid.root.children().len(), 1);
        assert_eq!(aid.root.children()[0].id, "7");
        assert_eq!(aid.root.children()[0].path.to_string(), "1");
    }

    #[test]
    fn test_parse_default_namespace() {
        let xml = r#"<ead xmlns="urn:isbn:1-931666-22-9"><eadheader><eadid>1</eadid>
<filedesc><titlestmt><titleproper>T</titleproper></titlestmt></filedesc></eadheader>
<archdesc><dsc><c><did><unitid>x</unitid><unittitle>y</unittitle></did></c></dsc></archdesc></ead>"#;
        let aid = parse_finding_aid(xml).unwrap();
        assert_eq!(aid.root.children()[0].title, "y");
    }

    #[test]
    fn test_parse_mixed_content_title() {
        let xml = r#"<ead><eadheader><eadid>1</eadid><titleproper>T</titleproper></eadheader>
<archdesc><dsc><c><did><unitid>9</unitid>
<unittitle>Letters
   from <persname>Jan</persname> &amp; family, <unitdate>1650</unitdate></unittitle>
</did></c></dsc></archdesc></ead>"#;
        let aid = parse_finding_aid(xml).unwrap();
        assert_eq!(
            aid.root.children()[0].title,
            "Letters from Jan & family, 1650"
        );
    }

    #[test]
    fn test_parse_missing_unittitle_names_path() {
        let xml = r#"<ead><eadheader><eadid>1</eadid><titleproper>T</titleproper></eadheader>
<archdesc><dsc>
<c><did><unitid>A</unitid><unittitle>A</unittitle></did>
  <c><did><unitid>A1</unitid><unittitle>ok</unittitle></did></c>
  <c><did><unitid>A2</unitid></did></c>
</c></dsc></archdesc></ead>"#;
        let err = parse_finding_aid(xml).unwrap_err();
        match err {
            EadError::MissingField { field, path } => {
                assert_eq!(field, "unittitle");
                assert_eq!(path.to_string(), "1.2");
            }
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_unitid_is_missing() {
        let xml = r#"<ead><eadheader><eadid>1</eadid><titleproper>T</titleproper></eadheader>
<archdesc><dsc><c><did><unitid>  </unitid><unittitle>x</unittitle></did></c></dsc></archdesc></ead>"#;
        let err = parse_finding_aid(xml).unwrap_err();
        assert!(matches!(err, EadError::MissingField { field: "unitid", .. }));
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_missing_eadid() {
        let xml = r#"<ead><eadheader><titleproper>T</titleproper></eadheader><archdesc/></ead>"#;
        let err = parse_finding_aid(xml).unwrap_err();
        assert!(matches!(err, EadError::MissingField { field: "eadid", .. }));
    }

    #[test]
    fn test_parse_missing_archdesc() {
        let xml = r#"<ead><eadheader><eadid>1</eadid><titleproper>T</titleproper></eadheader></ead>"#;
        let err = parse_finding_aid(xml).unwrap_err();
        assert!(matches!(err, EadError::MissingElement("archdesc")));
    }

    #[test]
    fn test_parse_without_dsc_yields_empty_root() {
        let xml = r#"<ead><eadheader><eadid>1</eadid><titleproper>T</titleproper></eadheader>
<archdesc><did><unittitle>x</unittitle></did></archdesc></ead>"#;
        let aid = parse_finding_aid(xml).unwrap();
        assert!(aid.root.children().is_empty());
        assert!(!aid.root.is_leaf());
    }

    #[test]
    fn test_parse_ignores_unrelated_elements() {
        let xml = r#"<ead><eadheader><eadid>1</eadid><titleproper>T</titleproper></eadheader>
<archdesc><dsc><head>Inventory</head>
<c><did><unitid>1</unitid><unittitle>One</unittitle><physdesc>2 scans</physdesc></did>
<scopecontent><p>Contains <c>no real unit</c></p></scopecontent></c>
</dsc></archdesc></ead>"#;
        let aid = parse_finding_aid(xml).unwrap();
        let top = aid.root.children();
        assert_eq!(top.len(), 1);
        assert!(top[0].is_leaf());
    }

    #[test]
    fn test_parse_more_than_nine_siblings() {
        let mut xml = String::from(
            "<ead><eadheader><eadid>1</eadid><titleproper>T</titleproper></eadheader><archdesc><dsc>",
        );
        for i in 1..=12 {
            xml.push_str(&format!(
                "<c><did><unitid>{i}</unitid><unittitle>Unit {i}</unittitle></did></c>"
            ));
        }
        xml.push_str("</dsc></archdesc></ead>");

        let aid = parse_finding_aid(&xml).unwrap();
        let top = aid.root.children();
        assert_eq!(top.len(), 12);
        assert_eq!(top[11].path.to_string(), "12");
        assert_eq!(top[11].id, "12");
    }

    #[test]
    fn test_parse_truncated_document() {
        let xml = r#"<ead><eadheader><eadid>1</eadid><titleproper>T</titleproper></eadheader>
<archdesc><dsc><c><did><unitid>1</unitid>"#;
        let err = parse_finding_aid(xml).unwrap_err();
        assert!(err.is_malformed());
    }
}
