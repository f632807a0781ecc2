use std::fmt;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::domain::XmlElement;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid XML response: {0}")]
    Xml(String),

    #[error("response is not a SOAP envelope (root element: {root})")]
    NotAnEnvelope { root: String },

    #[error("SOAP envelope has no body content")]
    EmptyBody,
}

/// SOAP 1.1 or 1.2 fault, flattened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    pub code: String,
    pub message: String,
    pub detail: Option<String>,
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoapBody {
    /// First element inside `Body`, e.g. `lihtandmed_v2Response`.
    Response(XmlElement),
    Fault(SoapFault),
}

/// Parse an XML document into a namespace-stripped element tree.
///
/// Document type declarations are refused outright so entity tricks never
/// reach the tree.
pub fn parse_xml(xml: &str) -> Result<XmlElement, TransportError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| TransportError::Xml(err.to_string()))?;
        match event {
            Event::Start(start) => stack.push(element_from(&start)?),
            Event::Empty(start) => {
                let element = element_from(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| TransportError::Xml("unexpected closing tag".to_owned()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|err| TransportError::Xml(err.to_string()))?;
                push_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                push_text(&mut stack, text.trim());
            }
            Event::DocType(_) => {
                return Err(TransportError::Xml(
                    "DOCTYPE declarations are not allowed".to_owned(),
                ));
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(TransportError::Xml(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| TransportError::Xml("document has no root element".to_owned()))
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlElement, TransportError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.local_name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| TransportError::Xml(err.to_string()))?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        let name = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|err| TransportError::Xml(err.to_string()))?
            .into_owned();
        element.attributes.push((name, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), TransportError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(TransportError::Xml(
                "document has more than one root element".to_owned(),
            ));
        }
    }
    Ok(())
}

fn push_text(stack: &mut [XmlElement], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(current) = stack.last_mut() {
        match &mut current.text {
            Some(existing) => existing.push_str(text),
            None => current.text = Some(text.to_owned()),
        }
    }
}

/// Decode a SOAP response into either its body element or its fault.
pub fn decode_soap_response(xml: &str) -> Result<SoapBody, TransportError> {
    let envelope = parse_xml(xml)?;
    if envelope.name != "Envelope" {
        return Err(TransportError::NotAnEnvelope {
            root: envelope.name,
        });
    }

    let content = envelope
        .child("Body")
        .and_then(|body| body.children.first())
        .ok_or(TransportError::EmptyBody)?;

    if content.name == "Fault" {
        return Ok(SoapBody::Fault(fault_from(content)));
    }
    Ok(SoapBody::Response(content.clone()))
}

fn fault_from(fault: &XmlElement) -> SoapFault {
    let code = fault
        .find_text(&["faultcode"])
        .or_else(|| fault.find_text(&["Code", "Value"]))
        .unwrap_or("Server");
    let message = fault
        .find_text(&["faultstring"])
        .or_else(|| fault.find_text(&["Reason", "Text"]))
        .unwrap_or("unknown fault");
    let detail = fault
        .child("detail")
        .or_else(|| fault.child("Detail"))
        .map(|detail| {
            let mut parts = Vec::new();
            collect_text(detail, &mut parts);
            parts.join(" ")
        })
        .filter(|detail| !detail.is_empty());

    SoapFault {
        code: code.to_owned(),
        message: message.to_owned(),
        detail,
    }
}

fn collect_text<'a>(element: &'a XmlElement, parts: &mut Vec<&'a str>) {
    if let Some(text) = element.text() {
        parts.push(text);
    }
    for child in &element.children {
        collect_text(child, parts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ns1="http://arireg.x-road.eu/producer/">
  <SOAP-ENV:Body>
    <ns1:lihtandmed_v2Response>
      <ns1:keha>
        <ns1:ettevotjad>
          <ns1:item>
            <ns1:ariregistri_kood>10060701</ns1:ariregistri_kood>
            <ns1:evnimi>Tom &amp; Co OÜ</ns1:evnimi>
            <ns1:staatus xsi:nil="true" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"/>
          </ns1:item>
        </ns1:ettevotjad>
      </ns1:keha>
    </ns1:lihtandmed_v2Response>
  </SOAP-ENV:Body>
</SOAP-ENV:Envelope>"#;

    #[test]
    fn decodes_response_element_without_namespaces() {
        let SoapBody::Response(body) = decode_soap_response(RESPONSE).unwrap() else {
            panic!("expected response body");
        };
        assert_eq!(body.name, "lihtandmed_v2Response");
        let item = body.find(&["keha", "ettevotjad", "item"]).unwrap();
        assert_eq!(item.find_text(&["ariregistri_kood"]), Some("10060701"));
        assert_eq!(item.find_text(&["evnimi"]), Some("Tom & Co OÜ"));
        assert_eq!(
            item.child("staatus").and_then(|el| el.attribute("nil")),
            Some("true")
        );
    }

    #[test]
    fn decodes_soap_11_fault() {
        let xml = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
  <soapenv:Body>
    <soapenv:Fault>
      <faultcode>SOAP-ENV:Server</faultcode>
      <faultstring>Ettevõtjat ei leitud</faultstring>
      <detail><veakood>404</veakood><kirjeldus>not found</kirjeldus></detail>
    </soapenv:Fault>
  </soapenv:Body>
</soapenv:Envelope>"#;
        let SoapBody::Fault(fault) = decode_soap_response(xml).unwrap() else {
            panic!("expected fault");
        };
        assert_eq!(fault.code, "SOAP-ENV:Server");
        assert_eq!(fault.message, "Ettevõtjat ei leitud");
        assert_eq!(fault.detail.as_deref(), Some("404 not found"));
        assert_eq!(
            fault.to_string(),
            "SOAP-ENV:Server: Ettevõtjat ei leitud (404 not found)"
        );
    }

    #[test]
    fn decodes_soap_12_fault() {
        let xml = r#"<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope">
  <env:Body>
    <env:Fault>
      <env:Code><env:Value>env:Sender</env:Value></env:Code>
      <env:Reason><env:Text xml:lang="en">Invalid request</env:Text></env:Reason>
    </env:Fault>
  </env:Body>
</env:Envelope>"#;
        let SoapBody::Fault(fault) = decode_soap_response(xml).unwrap() else {
            panic!("expected fault");
        };
        assert_eq!(fault.code, "env:Sender");
        assert_eq!(fault.message, "Invalid request");
        assert_eq!(fault.detail, None);
    }

    #[test]
    fn rejects_non_envelope_and_empty_body() {
        assert!(matches!(
            decode_soap_response("<html><body>oops</body></html>"),
            Err(TransportError::NotAnEnvelope { .. })
        ));
        assert!(matches!(
            decode_soap_response(
                r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body/></s:Envelope>"#
            ),
            Err(TransportError::EmptyBody)
        ));
    }

    #[test]
    fn rejects_malformed_xml_and_doctype() {
        assert!(matches!(parse_xml("<a><b></a>"), Err(TransportError::Xml(_))));
        assert!(matches!(parse_xml("<a>"), Err(TransportError::Xml(_))));
        assert!(matches!(parse_xml(""), Err(TransportError::Xml(_))));
        let xxe = r#"<?xml version="1.0"?><!DOCTYPE foo [<!ENTITY xxe SYSTEM "file:///etc/passwd">]><foo>&xxe;</foo>"#;
        assert!(matches!(parse_xml(xxe), Err(TransportError::Xml(_))));
    }

    #[test]
    fn keeps_cdata_text() {
        let element = parse_xml("<a><![CDATA[ <raw> & text ]]></a>").unwrap();
        assert_eq!(element.text(), Some("<raw> & text"));
    }
}
