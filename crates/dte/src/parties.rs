use dtesv_parties::{Company, Partner};

use crate::schema::{Address, Emitter, Receiver};
use crate::text::{
    self, ADDRESS_MAX, DEPARTMENT_MAX, EMAIL_MAX, NAME_MAX, PHONE_MAX,
};

/// Municipality code used until the host tracks municipalities.
pub const DEFAULT_MUNICIPALITY: &str = "01";
/// Department of the emitter's establishment.
pub const EMITTER_DEPARTMENT: &str = "01";
/// `tipoEstablecimiento` 01: branch / main office.
pub const ESTABLISHMENT_TYPE: &str = "01";

/// `receptor` block.
pub fn build_receiver(partner: &Partner) -> Receiver {
    Receiver {
        tipo_documento: partner.document_type().to_string(),
        num_documento: partner.document_number().to_string(),
        nrc: partner.nrc().map(str::to_string),
        nombre: text::truncate(&partner.name, NAME_MAX),
        cod_actividad: None,
        desc_actividad: None,
        direccion: Address {
            departamento: text::truncate(partner.department_code(), DEPARTMENT_MAX),
            municipio: DEFAULT_MUNICIPALITY.to_string(),
            complemento: text::truncate(partner.street(), ADDRESS_MAX),
        },
        telefono: text::truncate_opt(partner.phone(), PHONE_MAX),
        correo: text::truncate_opt(partner.email(), EMAIL_MAX),
    }
}

/// `emisor` block.
pub fn build_emitter(company: &Company) -> Emitter {
    let name = text::truncate(&company.name, NAME_MAX);

    Emitter {
        nit: company.nit().to_string(),
        nrc: company.nrc().to_string(),
        nombre: name.clone(),
        cod_actividad: company.activity_code().to_string(),
        desc_actividad: company.activity_description().to_string(),
        nombre_comercial: name,
        tipo_establecimiento: ESTABLISHMENT_TYPE.to_string(),
        direccion: Address {
            departamento: EMITTER_DEPARTMENT.to_string(),
            municipio: DEFAULT_MUNICIPALITY.to_string(),
            complemento: text::truncate(company.street(), ADDRESS_MAX),
        },
        telefono: text::truncate(company.phone(), PHONE_MAX),
        correo: text::truncate_opt(company.email(), EMAIL_MAX),
        cod_estable_mh: None,
        cod_estable: None,
        cod_punto_venta_mh: None,
        cod_punto_venta: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::tests::sample_invoice;
    use dtesv_core::AggregateId;
    use dtesv_parties::PartyId;

    #[test]
    fn receiver_projects_partner() {
        let invoice = sample_invoice();
        let receiver = build_receiver(&invoice.partner);

        assert_eq!(receiver.nombre, "Cliente Test");
        assert_eq!(receiver.num_documento, "0000000000");
        assert_eq!(receiver.tipo_documento, "36");
        assert_eq!(receiver.correo.as_deref(), Some("cliente@test.com"));
        assert_eq!(receiver.telefono.as_deref(), Some("2222-2222"));
        assert_eq!(receiver.direccion.complemento, "Calle Test 123");
        assert_eq!(receiver.direccion.municipio, "01");
    }

    #[test]
    fn receiver_without_optionals_uses_placeholders() {
        let mut partner = Partner::new(PartyId::new(AggregateId::new()), "N".repeat(250));
        partner.state_code = Some("061".to_string());

        let receiver = build_receiver(&partner);

        assert_eq!(receiver.nombre.chars().count(), 200);
        assert_eq!(receiver.direccion.departamento, "06");
        assert_eq!(receiver.direccion.complemento, "Ciudad");
        assert_eq!(receiver.telefono, None);
        assert_eq!(receiver.correo, None);
        assert_eq!(receiver.nrc, None);
    }

    #[test]
    fn emitter_projects_company() {
        let invoice = sample_invoice();
        let emitter = build_emitter(&invoice.company);

        assert_eq!(emitter.nombre, "Empresa Test FEL");
        assert_eq!(emitter.nombre_comercial, "Empresa Test FEL");
        assert_eq!(emitter.nit, "06140000000000");
        assert_eq!(emitter.nrc, "000000-0");
        assert_eq!(emitter.cod_actividad, "10005");
        assert_eq!(emitter.direccion.complemento, "San Salvador");
        assert_eq!(emitter.telefono, "0000-0000");
        assert_eq!(emitter.correo.as_deref(), Some("facturacion@empresa.test"));
        assert!(emitter.cod_estable_mh.is_none());
    }

    #[test]
    fn emitter_mh_codes_keep_their_uppercase_keys() {
        let emitter = build_emitter(&sample_invoice().company);
        let json = serde_json::to_value(&emitter).unwrap();

        assert!(json.as_object().unwrap().contains_key("codEstableMH"));
        assert!(json.as_object().unwrap().contains_key("codPuntoVentaMH"));
        assert!(json["codEstableMH"].is_null());
    }
}
