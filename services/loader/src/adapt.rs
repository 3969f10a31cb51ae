//! Format adapters: one per regional source, each turning the raw payload
//! into the common RawRecord field set.
//!
//! Adapters are deliberately permissive. They map and derive fields but never
//! filter records; malformed values flow through so the validator can reject
//! them with an accountable reason.

use anyhow::{anyhow, Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::Value;
use std::collections::HashMap;

use crate::record::{fields, RawRecord, Region};

pub fn adapt(region: Region, payload: &[u8]) -> Result<Vec<RawRecord>> {
    match region {
        Region::Cv => adapt_cv(payload),
        Region::Cat => adapt_cat(payload),
        Region::Gal => adapt_gal(payload),
    }
}

// =============================================================================
// CV — PRE-SCRAPED JSON ARRAY
// =============================================================================

/// The CV payload is a JSON array of station objects with upper-case Spanish
/// keys, already enriched with decimal LATITUD/LONGITUD.
fn adapt_cv(payload: &[u8]) -> Result<Vec<RawRecord>> {
    let root: Value =
        serde_json::from_slice(payload).context("CV payload is not valid JSON")?;
    let rows = root
        .as_array()
        .ok_or_else(|| anyhow!("CV payload is not a JSON array"))?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let tipo = json_str(row, "TIPO ESTACIÓN").to_lowercase();
        let municipio = json_str(row, "MUNICIPIO");
        let direccion = json_str(row, "DIRECCIÓN");

        let mut rec = RawRecord::new();
        if tipo.contains("fija") {
            rec.set_text(fields::KIND, "fixed");
            rec.set_text(fields::NAME, format!("Estación ITV de {municipio}"));
            rec.set_text(fields::ADDRESS, direccion);
            rec.set_text(fields::POSTAL_CODE, json_str(row, "C.POSTAL"));
            rec.set_text(fields::PROVINCE, json_str(row, "PROVINCIA"));
            rec.set_text(fields::LOCALITY, municipio);
            match row.get("LATITUD").and_then(Value::as_f64) {
                Some(lat) => rec.set_number(fields::LATITUDE, lat),
                None => rec.set_null(fields::LATITUDE),
            }
            match row.get("LONGITUD").and_then(Value::as_f64) {
                Some(lon) => rec.set_number(fields::LONGITUDE, lon),
                None => rec.set_null(fields::LONGITUDE),
            }
        } else if tipo.contains("móvil") || tipo.contains("movil") {
            rec.set_text(fields::KIND, "mobile");
            rec.set_text(fields::NAME, format!("Estación {direccion}"));
            set_no_location(&mut rec);
        } else if tipo.contains("agrícola") || tipo.contains("agricola") {
            rec.set_text(fields::KIND, "other");
            rec.set_text(fields::NAME, format!("Estación ITV Agrícola {direccion}"));
            set_no_location(&mut rec);
        } else {
            // Unknown type: keep the raw value so the rejection names it.
            rec.set_text(fields::KIND, tipo);
            rec.set_text(fields::NAME, if municipio.is_empty() { direccion } else { municipio });
        }

        let horario = json_str(row, "HORARIOS");
        let direccion = json_str(row, "DIRECCIÓN");
        rec.set_text(fields::SCHEDULE, &horario);
        rec.set_text(fields::DESCRIPTION, format!("{direccion} / {horario}"));
        rec.set_text(fields::CONTACT, json_str(row, "CORREO"));
        rec.set_text(fields::URL, "www.sitval.com");
        records.push(rec);
    }
    Ok(records)
}

fn set_no_location(rec: &mut RawRecord) {
    rec.set_null(fields::ADDRESS);
    rec.set_null(fields::POSTAL_CODE);
    rec.set_null(fields::PROVINCE);
    rec.set_null(fields::LOCALITY);
    rec.set_null(fields::LATITUDE);
    rec.set_null(fields::LONGITUDE);
}

fn json_str(row: &Value, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

// =============================================================================
// CAT — SOCRATA XML (/response/row/row)
// =============================================================================

/// The CAT payload is a Socrata XML export: records at `/response/row/row`,
/// coordinates in micro-degrees, the booking URL as a `url` attribute on the
/// `web` element.
fn adapt_cat(payload: &[u8]) -> Result<Vec<RawRecord>> {
    let mut reader = Reader::from_reader(payload);
    let mut buf = Vec::new();
    let mut records = Vec::new();

    let mut depth = 0usize;
    let mut current: Option<HashMap<String, String>> = None;
    let mut leaf: Option<String> = None;

    loop {
        match reader
            .read_event_into(&mut buf)
            .context("CAT payload is not well-formed XML")?
        {
            Event::Start(e) => {
                depth += 1;
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if depth == 3 && name == "row" {
                    current = Some(HashMap::new());
                } else if depth == 4 {
                    if name == "web" {
                        if let Some(values) = current.as_mut() {
                            for attr in e.attributes().flatten() {
                                if attr.key.as_ref() == b"url" {
                                    let url = attr
                                        .unescape_value()
                                        .context("bad url attribute in CAT payload")?;
                                    values.insert("web_url".to_string(), url.trim().to_string());
                                }
                            }
                        }
                    }
                    leaf = Some(name);
                }
            }
            Event::Empty(e) => {
                // Self-closing <web url=""/> variant.
                if depth == 3 && e.name().as_ref() == b"web" {
                    if let Some(values) = current.as_mut() {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"url" {
                                let url = attr
                                    .unescape_value()
                                    .context("bad url attribute in CAT payload")?;
                                values.insert("web_url".to_string(), url.trim().to_string());
                            }
                        }
                    }
                }
            }
            Event::Text(e) => {
                if let (Some(values), Some(field)) = (current.as_mut(), leaf.as_ref()) {
                    let text = e
                        .unescape()
                        .context("bad character data in CAT payload")?;
                    let text = text.trim();
                    if !text.is_empty() {
                        values.insert(field.clone(), text.to_string());
                    }
                }
            }
            Event::End(e) => {
                if depth == 3 && e.name().as_ref() == b"row" {
                    if let Some(values) = current.take() {
                        records.push(cat_record(&values));
                    }
                } else if depth == 4 {
                    leaf = None;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(records)
}

fn cat_record(values: &HashMap<String, String>) -> RawRecord {
    let get = |key: &str| values.get(key).map(String::as_str).unwrap_or("");
    let denominaci = get("denominaci");
    let direccion = get("adre_a");
    let cp = get("cp");
    let horario = get("horari_de_servei");

    let mut rec = RawRecord::new();
    rec.set_text(fields::NAME, format!("Estació de ITV de {denominaci}"));
    if cp.is_empty() && direccion.is_empty() {
        rec.set_text(fields::KIND, "other");
    } else {
        rec.set_text(fields::KIND, "fixed");
    }
    rec.set_text(fields::ADDRESS, direccion);
    rec.set_text(fields::POSTAL_CODE, cp);
    rec.set_text(fields::LOCALITY, denominaci);
    rec.set_text(fields::PROVINCE, get("serveis_territorials"));
    rec.set_text(fields::SCHEDULE, horario);
    rec.set_text(fields::DESCRIPTION, format!("{direccion} / {horario}"));
    rec.set_text(
        fields::CONTACT,
        format!("{} / {}", get("correu_electr_nic"), get("tel_atenc_public")),
    );
    rec.set_text(fields::URL, get("web_url"));

    // Socrata exports coordinates as micro-degrees.
    match get("lat").parse::<f64>() {
        Ok(lat) => rec.set_number(fields::LATITUDE, lat / 1_000_000.0),
        Err(_) => rec.set_null(fields::LATITUDE),
    }
    match get("long").parse::<f64>() {
        Ok(lon) => rec.set_number(fields::LONGITUDE, lon / 1_000_000.0),
        Err(_) => rec.set_null(fields::LONGITUDE),
    }
    rec
}

// =============================================================================
// GAL — SEMICOLON CSV WITH DEGREE-NOTATION COORDINATES
// =============================================================================

/// The GAL payload is a `;`-delimited CSV, UTF-8 or windows-1252, with a
/// `COORDENADAS GMAPS` column mixing decimal degrees and `D°M'S"` notation.
fn adapt_gal(payload: &[u8]) -> Result<Vec<RawRecord>> {
    let text = decode_text(payload);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .context("GAL payload has no header row")?
        .clone();
    let column = |key: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(key))
    };
    let col_name = column("NOME DA ESTACIÓN");
    let col_address = column("ENDEREZO");
    let col_postal = column("CÓDIGO POSTAL");
    let col_province = column("PROVINCIA");
    let col_phone = column("TELÉFONO");
    let col_schedule = column("HORARIO");
    let col_url = column("SOLICITUDE DE CITA PREVIA");
    let col_mail = column("CORREO ELECTRÓNICO");
    let col_coords = column("COORDENADAS GMAPS");

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.context("unreadable row in the GAL payload")?;
        // Truncated trailing rows in the source export.
        if row.len() < 10 {
            continue;
        }
        let get = |col: Option<usize>| col.and_then(|i| row.get(i)).unwrap_or("").trim();

        let name = get(col_name);
        let address = get(col_address);
        let postal = get(col_postal);
        let schedule = get(col_schedule);

        let mut rec = RawRecord::new();
        rec.set_text(fields::NAME, name);
        if !postal.is_empty() && !address.is_empty() {
            rec.set_text(fields::KIND, "fixed");
        } else {
            rec.set_text(fields::KIND, "other");
        }
        rec.set_text(fields::ADDRESS, address);
        rec.set_text(fields::POSTAL_CODE, postal);
        rec.set_text(fields::LOCALITY, locality_from_name(name));
        rec.set_text(fields::PROVINCE, normalize_province(get(col_province)));
        rec.set_text(fields::SCHEDULE, schedule);
        rec.set_text(fields::DESCRIPTION, format!("{address} {schedule}"));
        rec.set_text(
            fields::CONTACT,
            format!("{} {}", get(col_mail), get(col_phone)).trim().to_string(),
        );
        rec.set_text(fields::URL, get(col_url));

        let (lat, lon) = parse_gmaps_coords(get(col_coords));
        match lat {
            Some(v) => rec.set_number(fields::LATITUDE, v),
            None => rec.set_null(fields::LATITUDE),
        }
        match lon {
            Some(v) => rec.set_number(fields::LONGITUDE, v),
            None => rec.set_null(fields::LONGITUDE),
        }
        records.push(rec);
    }
    Ok(records)
}

/// UTF-8 when it decodes cleanly, windows-1252 otherwise. Both paths strip a
/// leading BOM.
fn decode_text(payload: &[u8]) -> String {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(payload);
    if !had_errors {
        return text.into_owned();
    }
    encoding_rs::WINDOWS_1252.decode(payload).0.into_owned()
}

/// The source carries no locality column; the station name embeds it
/// ("Estación ITV de Lugo" → "Lugo").
fn locality_from_name(name: &str) -> String {
    let lower = name.to_lowercase();
    for prefix in ["estación itv de ", "estación itv da ", "estación itv do "] {
        if lower.starts_with(prefix) {
            return name[prefix.len()..].trim().to_string();
        }
    }
    name.trim().to_string()
}

fn normalize_province(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "Desconocida".to_string();
    }
    if trimmed == "Coruña" {
        return "A Coruña".to_string();
    }
    trimmed.to_string()
}

/// `COORDENADAS GMAPS` holds "lat, lon". Values above 100 carry a misplaced
/// decimal point in the source and are divided by 10.
fn parse_gmaps_coords(raw: &str) -> (Option<f64>, Option<f64>) {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != 2 {
        return (None, None);
    }
    let fix = |v: f64| if v > 100.0 { v / 10.0 } else { v };
    (
        parse_coordinate(parts[0]).map(fix),
        parse_coordinate(parts[1]).map(fix),
    )
}

/// Parses a decimal coordinate or `D°M'S"` degree notation. Minutes and
/// seconds inherit the sign of the degrees.
fn parse_coordinate(input: &str) -> Option<f64> {
    let input = input.trim().replace('’', "'").replace('”', "\"");
    let deg_idx = match input.find('°') {
        Some(i) => i,
        None => return input.parse().ok(),
    };
    let degrees: f64 = input[..deg_idx].trim().parse().ok()?;
    let rest = &input[deg_idx + '°'.len_utf8()..];

    let (minutes, rest) = match rest.find('\'') {
        Some(i) => (rest[..i].trim().parse().unwrap_or(0.0), &rest[i + 1..]),
        None => (0.0, ""),
    };
    let seconds: f64 = match rest.find('"') {
        Some(i) => rest[..i].trim().parse().unwrap_or(0.0),
        None => 0.0,
    };

    let fraction = minutes / 60.0 + seconds / 3600.0;
    Some(if degrees.is_sign_negative() {
        degrees - fraction
    } else {
        degrees + fraction
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Scalar;

    // -------------------------------------------------------------------------
    // COORDINATE PARSING
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_decimal_coordinate() {
        assert_eq!(parse_coordinate("42.88"), Some(42.88));
        assert_eq!(parse_coordinate(" -8.54 "), Some(-8.54));
        assert_eq!(parse_coordinate("not a number"), None);
    }

    #[test]
    fn test_parse_degree_minute_second() {
        let v = parse_coordinate("43°0'12\"").unwrap();
        assert!((v - 43.003333).abs() < 1e-4, "got {v}");
    }

    #[test]
    fn test_parse_degree_minute_without_seconds() {
        assert_eq!(parse_coordinate("-8°24'"), Some(-8.4));
        assert_eq!(parse_coordinate("43°30'"), Some(43.5));
    }

    #[test]
    fn test_negative_degrees_carry_sign_into_fraction() {
        let v = parse_coordinate("-8°30'36\"").unwrap();
        assert!((v - (-8.51)).abs() < 1e-9, "got {v}");
    }

    #[test]
    fn test_gmaps_pair_with_decimal_fix() {
        let (lat, lon) = parse_gmaps_coords("428.8, -8.54");
        assert_eq!(lat, Some(42.88));
        assert_eq!(lon, Some(-8.54));
    }

    #[test]
    fn test_gmaps_pair_malformed() {
        assert_eq!(parse_gmaps_coords(""), (None, None));
        assert_eq!(parse_gmaps_coords("42.88"), (None, None));
        assert_eq!(parse_gmaps_coords("a, b, c"), (None, None));
    }

    // -------------------------------------------------------------------------
    // CV ADAPTER
    // -------------------------------------------------------------------------

    #[test]
    fn test_cv_fixed_station() {
        let payload = r#"[{
            "TIPO ESTACIÓN": "ITV Fija",
            "MUNICIPIO": "Valencia",
            "DIRECCIÓN": "Camí Vell 12",
            "C.POSTAL": "46014",
            "PROVINCIA": "Valencia",
            "HORARIOS": "L-V 8-20",
            "CORREO": "info@sitval.com",
            "LATITUD": 39.46,
            "LONGITUD": -0.39
        }]"#
        .as_bytes();
        let records = adapt_cv(payload).unwrap();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.text(fields::NAME), Some("Estación ITV de Valencia"));
        assert_eq!(rec.text(fields::KIND), Some("fixed"));
        assert_eq!(rec.text(fields::POSTAL_CODE), Some("46014"));
        assert_eq!(rec.text(fields::LOCALITY), Some("Valencia"));
        assert_eq!(rec.number(fields::LATITUDE), Some(39.46));
        assert_eq!(rec.text(fields::DESCRIPTION), Some("Camí Vell 12 / L-V 8-20"));
        assert_eq!(rec.text(fields::URL), Some("www.sitval.com"));
    }

    #[test]
    fn test_cv_mobile_station_has_no_location() {
        let payload = r#"[{
            "TIPO ESTACIÓN": "Unidad Móvil",
            "MUNICIPIO": "Requena",
            "DIRECCIÓN": "Unidad Móvil 3",
            "C.POSTAL": "46340",
            "HORARIOS": "L-V 9-14",
            "CORREO": "movil@sitval.com"
        }]"#
        .as_bytes();
        let records = adapt_cv(payload).unwrap();
        let rec = &records[0];
        assert_eq!(rec.text(fields::KIND), Some("mobile"));
        assert_eq!(rec.text(fields::NAME), Some("Estación Unidad Móvil 3"));
        assert_eq!(rec.get(fields::POSTAL_CODE), Some(&Scalar::Null));
        assert_eq!(rec.get(fields::LOCALITY), Some(&Scalar::Null));
        assert_eq!(rec.get(fields::LATITUDE), Some(&Scalar::Null));
    }

    #[test]
    fn test_cv_agricultural_station_is_other() {
        let payload = r#"[{
            "TIPO ESTACIÓN": "ITV Agrícola",
            "MUNICIPIO": "",
            "DIRECCIÓN": "Polígono 4",
            "HORARIOS": "",
            "CORREO": "agro@sitval.com"
        }]"#
        .as_bytes();
        let records = adapt_cv(payload).unwrap();
        assert_eq!(records[0].text(fields::KIND), Some("other"));
        assert_eq!(
            records[0].text(fields::NAME),
            Some("Estación ITV Agrícola Polígono 4")
        );
    }

    #[test]
    fn test_cv_unknown_type_passes_through() {
        let payload = r#"[{"TIPO ESTACIÓN": "Flotante", "MUNICIPIO": "Gandia", "CORREO": "x@y.z"}]"#.as_bytes();
        let records = adapt_cv(payload).unwrap();
        assert_eq!(records[0].text(fields::KIND), Some("flotante"));
    }

    #[test]
    fn test_cv_rejects_non_array_payload() {
        assert!(adapt_cv(br#"{"estaciones": []}"#).is_err());
        assert!(adapt_cv(b"not json at all").is_err());
    }

    // -------------------------------------------------------------------------
    // CAT ADAPTER
    // -------------------------------------------------------------------------

    const CAT_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <row>
    <row>
      <denominaci>Sant Boi de Llobregat</denominaci>
      <cp>08830</cp>
      <adre_a>Carrer de la Riera 4</adre_a>
      <lat>41343000</lat>
      <long>2036000</long>
      <horari_de_servei>L-V 8-20</horari_de_servei>
      <correu_electr_nic>itv@gencat.cat</correu_electr_nic>
      <tel_atenc_public>931234567</tel_atenc_public>
      <web url="https://itv.gencat.cat">itv.gencat.cat</web>
      <serveis_territorials>Barcelona</serveis_territorials>
    </row>
    <row>
      <denominaci>Unitat sense seu</denominaci>
      <horari_de_servei>L-V 9-14</horari_de_servei>
    </row>
  </row>
</response>"#;

    #[test]
    fn test_cat_fixed_station() {
        let records = adapt_cat(CAT_XML).unwrap();
        assert_eq!(records.len(), 2);
        let rec = &records[0];
        assert_eq!(
            rec.text(fields::NAME),
            Some("Estació de ITV de Sant Boi de Llobregat")
        );
        assert_eq!(rec.text(fields::KIND), Some("fixed"));
        assert_eq!(rec.text(fields::POSTAL_CODE), Some("08830"));
        assert_eq!(rec.text(fields::PROVINCE), Some("Barcelona"));
        assert_eq!(rec.text(fields::LOCALITY), Some("Sant Boi de Llobregat"));
        assert_eq!(rec.number(fields::LATITUDE), Some(41.343));
        assert_eq!(rec.number(fields::LONGITUDE), Some(2.036));
        assert_eq!(rec.text(fields::CONTACT), Some("itv@gencat.cat / 931234567"));
        assert_eq!(rec.text(fields::URL), Some("https://itv.gencat.cat"));
    }

    #[test]
    fn test_cat_record_without_address_is_other() {
        let records = adapt_cat(CAT_XML).unwrap();
        let rec = &records[1];
        assert_eq!(rec.text(fields::KIND), Some("other"));
        assert_eq!(rec.get(fields::LATITUDE), Some(&Scalar::Null));
    }

    #[test]
    fn test_cat_rejects_malformed_xml() {
        assert!(adapt_cat(b"<response><row>").is_err() || adapt_cat(b"<response><row>").unwrap().is_empty());
    }

    // -------------------------------------------------------------------------
    // GAL ADAPTER
    // -------------------------------------------------------------------------

    const GAL_CSV: &[u8] = "NOME DA ESTACI\u{d3}N;ENDEREZO;CONCELLO;C\u{d3}DIGO POSTAL;PROVINCIA;TEL\u{c9}FONO;HORARIO;SOLICITUDE DE CITA PREVIA;CORREO ELECTR\u{d3}NICO;COORDENADAS GMAPS\nEstaci\u{f3}n ITV de Santiago;R\u{fa}a do Porto 1;Santiago;15890;Coru\u{f1}a;981123456;L-V 8-20;https://cita.itvgalicia.es;santiago@itvgalicia.es;42\u{b0}53'24\", -8\u{b0}32'24\"\nEstaci\u{f3}n ITV do Porri\u{f1}o;;O Porri\u{f1}o;;Pontevedra;986123456;L-V 9-14;;porrino@itvgalicia.es;\n".as_bytes();

    #[test]
    fn test_gal_fixed_station() {
        let records = adapt_gal(GAL_CSV).unwrap();
        assert_eq!(records.len(), 2);
        let rec = &records[0];
        assert_eq!(rec.text(fields::NAME), Some("Estación ITV de Santiago"));
        assert_eq!(rec.text(fields::KIND), Some("fixed"));
        assert_eq!(rec.text(fields::LOCALITY), Some("Santiago"));
        assert_eq!(rec.text(fields::PROVINCE), Some("A Coruña"));
        let lat = rec.number(fields::LATITUDE).unwrap();
        let lon = rec.number(fields::LONGITUDE).unwrap();
        assert!((lat - 42.89).abs() < 1e-9, "got {lat}");
        assert!((lon - (-8.54)).abs() < 1e-9, "got {lon}");
    }

    #[test]
    fn test_gal_row_without_address_is_other() {
        let records = adapt_gal(GAL_CSV).unwrap();
        let rec = &records[1];
        assert_eq!(rec.text(fields::KIND), Some("other"));
        assert_eq!(rec.text(fields::LOCALITY), Some("Porriño"));
        assert_eq!(rec.get(fields::LATITUDE), Some(&Scalar::Null));
    }

    #[test]
    fn test_gal_windows_1252_fallback() {
        let mut payload = Vec::new();
        payload.extend_from_slice(b"NOME DA ESTACI\xd3N;ENDEREZO;CONCELLO;C\xd3DIGO POSTAL;PROVINCIA;TEL\xc9FONO;HORARIO;SOLICITUDE DE CITA PREVIA;CORREO ELECTR\xd3NICO;COORDENADAS GMAPS\n");
        payload.extend_from_slice(b"Estaci\xf3n ITV de Lugo;Estrada Vella 2;Lugo;27003;Lugo;982123456;L-V 8-20;;lugo@itvgalicia.es;43.01, -7.55\n");
        let records = adapt_gal(&payload).unwrap();
        assert_eq!(records[0].text(fields::NAME), Some("Estación ITV de Lugo"));
        assert_eq!(records[0].text(fields::LOCALITY), Some("Lugo"));
        assert_eq!(records[0].number(fields::LATITUDE), Some(43.01));
    }

    #[test]
    fn test_gal_locality_prefix_variants() {
        assert_eq!(locality_from_name("Estación ITV de Santiago"), "Santiago");
        assert_eq!(locality_from_name("Estación ITV do Porriño"), "Porriño");
        assert_eq!(locality_from_name("Estación ITV da Coruña"), "Coruña");
        assert_eq!(locality_from_name("Outra cousa"), "Outra cousa");
    }
}
