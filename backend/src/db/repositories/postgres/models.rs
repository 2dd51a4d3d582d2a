use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};

use super::schema::{genes, motifs, users};
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{
    BindingSiteRow, EntrezId, Gene, GeneBindingSite, Motif, MotifGeneRow, Strand, User,
};

fn parse_strand(value: &str, entity: &str) -> RepositoryResult<Strand> {
    value.parse().map_err(|e: String| {
        RepositoryError::validation_with_context(
            e,
            ErrorContext::new("decode_row").with_entity(entity),
        )
    })
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = genes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // id is only used for joins
pub struct GeneRow {
    pub id: i64,
    pub entrez_id: i64,
    pub name: String,
    pub chromosome: String,
    pub orientation: String,
    pub tss: i64,
    pub start_promoter: i64,
    pub stop_promoter: i64,
}

impl GeneRow {
    pub fn into_gene(self) -> RepositoryResult<Gene> {
        Ok(Gene {
            entrez_id: EntrezId::new(self.entrez_id),
            strand: parse_strand(&self.orientation, "gene")?,
            name: self.name,
            chromosome: self.chromosome,
            tss: self.tss,
            start_promoter: self.start_promoter,
            stop_promoter: self.stop_promoter,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = motifs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MotifRow {
    pub id: i64,
    pub name: String,
}

impl From<MotifRow> for Motif {
    fn from(row: MotifRow) -> Self {
        Motif {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub permissions: Vec<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            username: row.username,
            password_hash: row.password_hash,
            is_active: row.is_active,
            permissions: row.permissions.into_iter().collect(),
        }
    }
}

/// A TFBS row joined with its motif name, loaded through the query DSL.
pub type GeneBindingSiteTuple = (String, String, i64, i64, f64, String);

pub fn gene_binding_site(row: GeneBindingSiteTuple) -> RepositoryResult<GeneBindingSite> {
    let (motif_name, orientation, start, stop, p_value, match_sequence) = row;
    Ok(GeneBindingSite {
        motif_name,
        strand: parse_strand(&orientation, "tfbs")?,
        start,
        stop,
        p_value,
        match_sequence,
    })
}

/// Grouped row of the TF histogram query.
#[derive(Debug, Clone, QueryableByName)]
pub struct BindingSiteAggRow {
    #[diesel(sql_type = Text)]
    pub gene_name: String,
    #[diesel(sql_type = Text)]
    pub chromosome: String,
    #[diesel(sql_type = Text)]
    pub orientation: String,
    #[diesel(sql_type = BigInt)]
    pub tss: i64,
    #[diesel(sql_type = BigInt)]
    pub start_promoter: i64,
    #[diesel(sql_type = BigInt)]
    pub stop_promoter: i64,
    #[diesel(sql_type = BigInt)]
    pub start: i64,
    #[diesel(sql_type = BigInt)]
    pub stop: i64,
    #[diesel(sql_type = BigInt)]
    pub num_sites: i64,
}

impl BindingSiteAggRow {
    pub fn into_row(self) -> RepositoryResult<BindingSiteRow> {
        Ok(BindingSiteRow {
            strand: parse_strand(&self.orientation, "gene")?,
            gene_name: self.gene_name,
            chromosome: self.chromosome,
            tss: self.tss,
            start_promoter: self.start_promoter,
            stop_promoter: self.stop_promoter,
            start: self.start,
            stop: self.stop,
            num_sites: self.num_sites,
        })
    }
}

/// Grouped row of the genes-for-motif export query.
#[derive(Debug, Clone, QueryableByName)]
pub struct MotifGeneAggRow {
    #[diesel(sql_type = BigInt)]
    pub entrez_id: i64,
    #[diesel(sql_type = Text)]
    pub gene_name: String,
    #[diesel(sql_type = Text)]
    pub chromosome: String,
    #[diesel(sql_type = Text)]
    pub orientation: String,
    #[diesel(sql_type = BigInt)]
    pub tss: i64,
    #[diesel(sql_type = BigInt)]
    pub start_promoter: i64,
    #[diesel(sql_type = BigInt)]
    pub stop_promoter: i64,
    #[diesel(sql_type = BigInt)]
    pub num_sites: i64,
}

impl MotifGeneAggRow {
    pub fn into_row(self) -> RepositoryResult<MotifGeneRow> {
        Ok(MotifGeneRow {
            entrez_id: EntrezId::new(self.entrez_id),
            strand: parse_strand(&self.orientation, "gene")?,
            gene_name: self.gene_name,
            chromosome: self.chromosome,
            tss: self.tss,
            start_promoter: self.start_promoter,
            stop_promoter: self.stop_promoter,
            num_sites: self.num_sites,
        })
    }
}

/// Single text column returned by the completion queries.
#[derive(Debug, Clone, QueryableByName)]
pub struct NameRow {
    #[diesel(sql_type = Text)]
    pub name: String,
}
