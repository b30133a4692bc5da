//! Wire types of the "Factura" DTE (schema version 1).
//!
//! Field names follow the Hacienda JSON schema. Absent values serialize as
//! explicit `null`; the schema requires every key to be present.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dtesv_invoicing::GenerationCode;

/// Envelope posted to the signing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningRequest {
    /// Emitter NIT; the signer looks up the certificate by it.
    pub nit: String,
    pub activo: bool,
    /// Password protecting the emitter's private key in the signer.
    pub password_pri: Option<String>,
    pub dte_json: DteJson,
}

/// The unsigned DTE document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DteJson {
    pub identificacion: Identification,
    pub emisor: Emitter,
    pub receptor: Receiver,
    pub cuerpo_documento: Vec<DteItem>,
    pub resumen: Summary,
    pub extension: Extension,
    pub apendice: Vec<AppendixEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identification {
    pub version: u8,
    pub ambiente: String,
    pub tipo_dte: String,
    pub numero_control: String,
    pub codigo_generacion: GenerationCode,
    pub tipo_modelo: u8,
    pub tipo_operacion: u8,
    /// `YYYY-MM-DD`.
    pub fec_emi: String,
    /// `HH:MM:SS`, El Salvador local time.
    pub hor_emi: String,
    pub tipo_moneda: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub departamento: String,
    pub municipio: String,
    pub complemento: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emitter {
    pub nit: String,
    pub nrc: String,
    pub nombre: String,
    pub cod_actividad: String,
    pub desc_actividad: String,
    pub nombre_comercial: String,
    pub tipo_establecimiento: String,
    pub direccion: Address,
    pub telefono: String,
    pub correo: Option<String>,
    #[serde(rename = "codEstableMH")]
    pub cod_estable_mh: Option<String>,
    pub cod_estable: Option<String>,
    #[serde(rename = "codPuntoVentaMH")]
    pub cod_punto_venta_mh: Option<String>,
    pub cod_punto_venta: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receiver {
    pub tipo_documento: String,
    pub num_documento: String,
    pub nrc: Option<String>,
    pub nombre: String,
    pub cod_actividad: Option<String>,
    pub desc_actividad: Option<String>,
    pub direccion: Address,
    pub telefono: Option<String>,
    pub correo: Option<String>,
}

/// One entry of `cuerpoDocumento`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DteItem {
    pub num_item: u32,
    pub tipo_item: u8,
    pub numero_documento: Option<String>,
    pub cantidad: Decimal,
    pub codigo: Option<String>,
    pub cod_tributo: Option<String>,
    pub uni_medida: u16,
    pub descripcion: String,
    /// Unit price with VAT, 4 dp.
    pub precio_uni: Decimal,
    pub monto_descu: Decimal,
    pub venta_no_suj: Decimal,
    pub venta_exenta: Decimal,
    /// Line total with VAT, 2 dp.
    pub venta_gravada: Decimal,
    pub tributos: Option<Vec<String>>,
    /// Suggested sale price (source unit price).
    pub psv: Decimal,
    pub no_gravado: Decimal,
    pub iva_item: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_no_suj: Decimal,
    pub total_exenta: Decimal,
    pub total_gravada: Decimal,
    pub sub_total_ventas: Decimal,
    pub descu_no_suj: Decimal,
    pub descu_exenta: Decimal,
    pub descu_gravada: Decimal,
    pub porcentaje_descuento: Decimal,
    pub total_descu: Decimal,
    pub tributos: Option<Vec<String>>,
    pub sub_total: Decimal,
    pub iva_rete1: Decimal,
    pub rete_renta: Decimal,
    pub monto_total_operacion: Decimal,
    pub total_no_gravado: Decimal,
    pub total_pagar: Decimal,
    pub total_letras: String,
    pub total_iva: Decimal,
    pub saldo_favor: Decimal,
    /// 1 = cash, 2 = credit.
    pub condicion_operacion: u8,
    pub pagos: Option<Vec<serde_json::Value>>,
    pub num_pago_electronico: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub nomb_entrega: Option<String>,
    pub docu_entrega: Option<String>,
    pub nomb_recibe: Option<String>,
    pub docu_recibe: Option<String>,
    pub observaciones: Option<String>,
    pub placa_vehiculo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendixEntry {
    pub campo: String,
    pub etiqueta: String,
    pub valor: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_serialize_as_null() {
        let ext = Extension {
            nomb_entrega: None,
            docu_entrega: None,
            nomb_recibe: None,
            docu_recibe: None,
            observaciones: Some("Observaciones de prueba".to_string()),
            placa_vehiculo: None,
        };
        let json = serde_json::to_value(&ext).unwrap();

        assert!(json["nombEntrega"].is_null());
        assert!(json.as_object().unwrap().contains_key("placaVehiculo"));
        assert_eq!(json["observaciones"], "Observaciones de prueba");
    }

    #[test]
    fn amounts_are_json_numbers_not_strings() {
        let json = serde_json::to_value(Decimal::new(1130000, 4)).unwrap();
        assert!(json.is_number(), "{json}");
        assert_eq!(json.as_f64(), Some(113.0));
    }
}
