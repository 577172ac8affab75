//! Named query slots and the per-run query plan

use crate::adapters::database::DataSource;
use crate::config::QueriesConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One named SQL template and where it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuerySlot {
    /// Card holders with tax reporting
    CardTaxRptForPers,
    /// Card owners
    CardOwnPers,
    /// Non-card holders with tax reporting
    NoCardTaxRptForPers,
    /// Non-card owners
    NoCardOwnPers,
    /// Organization-owned cards
    CardOwnPersOrg,
    /// Organizations
    Org,
    /// Customers known to the secondary source
    P2pCustOrg,
}

impl QuerySlot {
    /// Every slot, in execution order
    pub const ALL: [QuerySlot; 7] = [
        QuerySlot::CardTaxRptForPers,
        QuerySlot::CardOwnPers,
        QuerySlot::NoCardTaxRptForPers,
        QuerySlot::NoCardOwnPers,
        QuerySlot::CardOwnPersOrg,
        QuerySlot::Org,
        QuerySlot::P2pCustOrg,
    ];

    /// Configuration key of the slot
    pub fn name(self) -> &'static str {
        match self {
            QuerySlot::CardTaxRptForPers => "card_tax_rpt_for_pers",
            QuerySlot::CardOwnPers => "card_own_pers",
            QuerySlot::NoCardTaxRptForPers => "no_card_tax_rpt_for_pers",
            QuerySlot::NoCardOwnPers => "no_card_own_pers",
            QuerySlot::CardOwnPersOrg => "card_own_pers_org",
            QuerySlot::Org => "org",
            QuerySlot::P2pCustOrg => "p2p_cust_org",
        }
    }

    /// Data source the slot runs against
    pub fn source(self) -> DataSource {
        match self {
            QuerySlot::P2pCustOrg => DataSource::Secondary,
            _ => DataSource::Primary,
        }
    }

    /// Whether rows describe organizations (no person overrides, no ID block)
    pub fn is_organization(self) -> bool {
        matches!(self, QuerySlot::CardOwnPersOrg | QuerySlot::Org)
    }

    /// Whether the template is prefixed with the shared `sql_qq` block
    pub fn uses_shared_prefix(self) -> bool {
        !matches!(self, QuerySlot::Org | QuerySlot::P2pCustOrg)
    }

    /// Whether every worker runs the slot with its own partition
    ///
    /// The secondary query has no partition parameters, so only one worker runs
    /// it; otherwise its rows would repeat once per worker.
    pub fn is_partitioned(self) -> bool {
        self.source() == DataSource::Primary
    }

    fn template(self, queries: &QueriesConfig) -> &str {
        match self {
            QuerySlot::CardTaxRptForPers => &queries.card_tax_rpt_for_pers,
            QuerySlot::CardOwnPers => &queries.card_own_pers,
            QuerySlot::NoCardTaxRptForPers => &queries.no_card_tax_rpt_for_pers,
            QuerySlot::NoCardOwnPers => &queries.no_card_own_pers,
            QuerySlot::CardOwnPersOrg => &queries.card_own_pers_org,
            QuerySlot::Org => &queries.org,
            QuerySlot::P2pCustOrg => &queries.p2p_cust_org,
        }
    }
}

impl fmt::Display for QuerySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A slot with its final SQL text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedQuery {
    /// The slot
    pub slot: QuerySlot,
    /// SQL ready to prepare
    pub sql: String,
}

/// Every slot resolved to SQL once at start-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    queries: Vec<PlannedQuery>,
    customer_sql: String,
}

impl QueryPlan {
    /// Resolves every slot from configuration
    ///
    /// Slots that take the shared prefix get `sql_qq` and a newline in front of
    /// their template.
    pub fn from_config(queries: &QueriesConfig) -> Self {
        let planned = QuerySlot::ALL
            .iter()
            .map(|&slot| {
                let template = slot.template(queries);
                let sql = if slot.uses_shared_prefix() {
                    format!("{}\n{}", queries.sql_qq, template)
                } else {
                    template.to_string()
                };
                PlannedQuery { slot, sql }
            })
            .collect();

        Self {
            queries: planned,
            customer_sql: queries.p2p_cust_org.clone(),
        }
    }

    /// Builds a plan from explicit slot SQL
    pub fn new(queries: Vec<PlannedQuery>, customer_sql: impl Into<String>) -> Self {
        Self {
            queries,
            customer_sql: customer_sql.into(),
        }
    }

    /// Planned queries in execution order
    pub fn queries(&self) -> &[PlannedQuery] {
        &self.queries
    }

    /// SQL that loads the customer override lookup
    pub fn customer_sql(&self) -> &str {
        &self.customer_sql
    }
}
