//! Borderel manifest document and its XML rendering

use crate::domain::{ManifestError, ReportId};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use std::io::Cursor;

const BORDEREL_NAMESPACE: &str = "http://MFT-01-00.abb.vlaanderen.be/Borderel";
const BORDEREL_SCHEMA_LOCATION: &str = "http://MFT-01-00.abb.vlaanderen.be/Borderel Borderel.xsd";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Parameter name carrying the key value
pub const KEY_PARAMETER: &str = "SLEUTEL";

/// Parameter name carrying the delivery flow marker
pub const FLOW_PARAMETER: &str = "FLOW";

/// Routing block of the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingMetadata {
    /// Organisation identifier
    pub entity: String,

    /// Application identifier
    pub application: String,
}

/// A single file listed in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Name of the file inside the archive
    pub name: String,
}

/// The "borderel" manifest describing one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    /// Report the manifest belongs to
    pub report_id: ReportId,

    /// Routing metadata
    pub routing: RoutingMetadata,

    /// Value of the `SLEUTEL` parameter
    pub key: String,

    /// Value of the `FLOW` parameter
    pub flow: String,

    /// One entry per packaged file, in input order
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Names of the listed files, in order
    pub fn file_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Name of the staged manifest file for this report
    pub fn staging_file_name(&self) -> String {
        format!("{}-borderel.xml", self.report_id)
    }

    /// Render the manifest as indented XML with a declaration
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Build`] if the writer fails.
    pub fn to_xml(&self) -> Result<String, ManifestError> {
        let mut writer = XmlWriter::new();

        writer.declaration()?;
        writer.start_with_attributes(
            "ns1:Borderel",
            &[
                ("xsi:schemaLocation", BORDEREL_SCHEMA_LOCATION),
                ("xmlns:xsi", XSI_NAMESPACE),
                ("xmlns:ns1", BORDEREL_NAMESPACE),
            ],
        )?;

        writer.start("ns1:RouteringsMetadata")?;
        writer.text_element("Entiteit", &self.routing.entity)?;
        writer.text_element("Toepassing", &self.routing.application)?;
        writer.end("ns1:RouteringsMetadata")?;

        writer.start("ParameterSet")?;
        for (parameter, value) in [(KEY_PARAMETER, &self.key), (FLOW_PARAMETER, &self.flow)] {
            writer.start("ParameterParameterWaarde")?;
            writer.text_element("Parameter", parameter)?;
            writer.text_element("ParameterWaarde", value)?;
            writer.end("ParameterParameterWaarde")?;
        }
        writer.end("ParameterSet")?;

        writer.start("ns1:Bestanden")?;
        for entry in &self.entries {
            writer.start("Bestand")?;
            writer.text_element("Bestandsnaam", &entry.name)?;
            writer.end("Bestand")?;
        }
        writer.end("ns1:Bestanden")?;

        writer.end("ns1:Borderel")?;
        writer.finish()
    }
}

/// Thin wrapper over the quick-xml writer mapping its errors
struct XmlWriter {
    inner: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), ManifestError> {
        self.inner
            .write_event(event)
            .map_err(|e| ManifestError::Build(e.to_string()))
    }

    fn declaration(&mut self) -> Result<(), ManifestError> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn start(&mut self, name: &str) -> Result<(), ManifestError> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    fn start_with_attributes(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
    ) -> Result<(), ManifestError> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.write(Event::Start(element))
    }

    fn end(&mut self, name: &str) -> Result<(), ManifestError> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), ManifestError> {
        self.start(name)?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn finish(self) -> Result<String, ManifestError> {
        let bytes = self.inner.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| ManifestError::Build(e.to_string()))
    }
}
