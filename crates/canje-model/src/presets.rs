//! Built-in rule tables for the survey exports of the incentive campaign.

use serde::{Deserialize, Serialize};

use crate::rules::{
    CategoryRewrite, ConstantFieldRule, DayOfMonthRule, ExclusionRule, PartitionRule,
    PhotoFlagRule, RuleTable, Selector, ThresholdPredicate,
};

pub const ID_FIELD: &str = "ID de la encuesta";
pub const TIMESTAMP_FIELD: &str = "Fecha y hora de la encuesta";
pub const EMPLOYEE_FIELD: &str = "Empleado";
pub const DYNAMIC_FIELD: &str = "Indicar tipo de Dinámica a canjear";
pub const CATEGORY_FIELD: &str = "Especificar en que categoría realizó mas compra.";
pub const POLO_COUNT_FIELD: &str = "¿Cantidad de promocional entregado? - POLO QROMA";
pub const POLO_EXTRA_FIELD: &str =
    "¿Realizaste una entrega de promocional adicional?  - POLO QROMA";
pub const AMOUNT_FIELD: &str =
    "Monto total del comprobante (de productos participantes en canjes regulares)";
pub const PHOTO_FLAG_FIELD: &str = "¿Tomaste foto del comprobante?";
pub const PHOTO_LINK_FIELD: &str = "Foto del comprobante (Boleta Factura o Ticket de pago)";
pub const TICKET_FLAG_FIELD: &str = "¿Se entregó este promocional? - TICKET SORTEO TV ENERO 2026";
pub const TICKET_COUNT_FIELD: &str = "Cantidad de promocional entregado - TICKET SORTEO TV ENERO 2026";
pub const REMINDER_FIELD: &str = "\"RECUERDA: TODA ESTA INFORMACIÓN DEBE LLENARSE TODOS LOS DATOS DEL CLIENTE. NO SE PERMITIRÁ REGISTROS INCOMPLETOS, SI EL CLIENTE NO PERMITE TOMAR FOTO DE SU BOLETA COMUNICARLE QUE NO PODRA PARTICIPAR\"";

pub const DAY_OF_MONTH_FIELD: &str = "AUXILIAR";
pub const FOCO_VALUE: &str = "Dinámica Foco";
pub const MONTO_VALUE: &str = "Dinámica Monto";

/// Ticket questions that only make sense for the raffle export.
const TICKET_ONLY_FIELDS: [&str; 8] = [
    TICKET_FLAG_FIELD,
    "Pregunta adicional - Tu pdv pertenece a la ciudad de CUSCO o AREQUIPA",
    TICKET_COUNT_FIELD,
    "Pregunta adicional - Indicar tu nombre y apellido",
    "Pregunta adicional - Indicar tu numero celular o teléfono (NO AGREGAR ESPACIOS)",
    "Pregunta adicional - Indicar tu numero de DNI O CE (INCLUIR CEROS)",
    "Pregunta adicional - Ingresar el NUMERO DE CORRELATIVO del  ticket 1",
    "Pregunta adicional - Ingresar el NUMERO DE CORRELATIVO del  ticket 2",
];

/// Built-in promotion variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Polo giveaway validated per "Dinámica Foco" / "Dinámica Monto".
    Polo,
    /// TV raffle tickets validated per delivered ticket count.
    TicketSorteo,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Polo, Variant::TicketSorteo];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Polo => "polo",
            Variant::TicketSorteo => "ticket_sorteo",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Variant::Polo => "Polo promo: Foco and Monto payout thresholds",
            Variant::TicketSorteo => "Ticket Sorteo promo: raffle tickets per purchase amount",
        }
    }

    pub fn rule_table(self) -> RuleTable {
        match self {
            Variant::Polo => polo_rules(),
            Variant::TicketSorteo => ticket_sorteo_rules(),
        }
    }
}

fn day_of_month() -> DayOfMonthRule {
    DayOfMonthRule {
        timestamp_field: TIMESTAMP_FIELD.to_string(),
        anchor_field: EMPLOYEE_FIELD.to_string(),
        output_field: DAY_OF_MONTH_FIELD.to_string(),
    }
}

fn photo_flag() -> PhotoFlagRule {
    PhotoFlagRule {
        flag_field: PHOTO_FLAG_FIELD.to_string(),
        evidence_field: PHOTO_LINK_FIELD.to_string(),
    }
}

/// Variant A: the Polo giveaway.
pub fn polo_rules() -> RuleTable {
    let mut drop_fields: Vec<String> = vec![TICKET_FLAG_FIELD.to_string(), REMINDER_FIELD.to_string()];
    drop_fields.extend(TICKET_ONLY_FIELDS[1..].iter().map(|f| (*f).to_string()));
    drop_fields.push("Pregunta adicional - Especificar en que marca realizó mas compra.".to_string());

    RuleTable {
        name: Variant::Polo.name().to_string(),
        label: "Polo".to_string(),
        id_field: ID_FIELD.to_string(),
        discriminator_field: DYNAMIC_FIELD.to_string(),
        count_field: POLO_COUNT_FIELD.to_string(),
        amount_field: AMOUNT_FIELD.to_string(),
        evidence_field: Some(PHOTO_LINK_FIELD.to_string()),
        drop_fields,
        day_of_month: Some(day_of_month()),
        constant_fields: vec![ConstantFieldRule {
            field: POLO_EXTRA_FIELD.to_string(),
            value: "NO".to_string(),
            anchor_field: POLO_COUNT_FIELD.to_string(),
            before_field: AMOUNT_FIELD.to_string(),
        }],
        photo_flag: Some(photo_flag()),
        category_rewrites: vec![CategoryRewrite {
            field: CATEGORY_FIELD.to_string(),
            when_equals: FOCO_VALUE.to_string(),
            default_value: "ESMALTES".to_string(),
            override_token: "TEMPLE PATO".to_string(),
            override_value: "BASES".to_string(),
        }],
        exclusions: Vec::new(),
        partitions: vec![
            PartitionRule {
                name: "FOCO".to_string(),
                selector: Selector::Equals(FOCO_VALUE.to_string()),
                missing_count_default: None,
                sheet: "FOCO_FILTRADO".to_string(),
                predicates: vec![
                    ThresholdPredicate::new(1, 20.0, "FOCO: entregó 1 polo con monto < 20"),
                    ThresholdPredicate::new(2, 40.0, "FOCO: entregó 2 polos con monto < 40"),
                ],
            },
            PartitionRule {
                name: "MONTO".to_string(),
                selector: Selector::Equals(MONTO_VALUE.to_string()),
                missing_count_default: None,
                sheet: "MONTO_FILTRADO".to_string(),
                predicates: vec![
                    ThresholdPredicate::new(0, 200.0, "MONTO: polos=0 con monto < 200"),
                    ThresholdPredicate::new(1, 200.0, "MONTO: entregó 1 polo con monto < 200"),
                    ThresholdPredicate::new(2, 300.0, "MONTO: entregó 2 polos con monto < 300"),
                ],
            },
        ],
        result_sheet: "RESULTADO".to_string(),
        errors_sheet: "ERRORES".to_string(),
    }
}

/// Variant B: the TV raffle tickets.
pub fn ticket_sorteo_rules() -> RuleTable {
    RuleTable {
        name: Variant::TicketSorteo.name().to_string(),
        label: "Ticket Sorteo".to_string(),
        id_field: ID_FIELD.to_string(),
        discriminator_field: TICKET_FLAG_FIELD.to_string(),
        count_field: TICKET_COUNT_FIELD.to_string(),
        amount_field: AMOUNT_FIELD.to_string(),
        evidence_field: Some(PHOTO_LINK_FIELD.to_string()),
        drop_fields: vec![
            POLO_COUNT_FIELD.to_string(),
            POLO_EXTRA_FIELD.to_string(),
            REMINDER_FIELD.to_string(),
        ],
        day_of_month: Some(day_of_month()),
        constant_fields: Vec::new(),
        photo_flag: Some(photo_flag()),
        category_rewrites: Vec::new(),
        exclusions: vec![ExclusionRule {
            field: TICKET_FLAG_FIELD.to_string(),
            blank: true,
            values: Vec::new(),
        }],
        partitions: vec![PartitionRule {
            name: "TICKET".to_string(),
            selector: Selector::NotEquals("NO".to_string()),
            missing_count_default: Some(1),
            sheet: "TICKET_FILTRADO".to_string(),
            predicates: vec![
                ThresholdPredicate::new(1, 200.0, "TICKET: cantidad=1 con monto < 200"),
                ThresholdPredicate::new(2, 300.0, "TICKET: cantidad=2 con monto < 300"),
            ],
        }],
        result_sheet: "RESULTADO".to_string(),
        errors_sheet: "ERRORES".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for variant in Variant::ALL {
            let table = variant.rule_table();
            table.validate().expect("preset validates");
            assert_eq!(table.name, variant.name());
        }
    }

    #[test]
    fn polo_drops_ticket_columns_only() {
        let table = polo_rules();
        assert!(table.drop_fields.iter().any(|f| f == TICKET_COUNT_FIELD));
        assert!(!table.drop_fields.iter().any(|f| f == POLO_COUNT_FIELD));
        assert_eq!(table.drop_fields.len(), 10);
    }

    #[test]
    fn partitions_in_declared_order() {
        let names: Vec<_> = polo_rules()
            .partitions
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["FOCO", "MONTO"]);
    }
}
