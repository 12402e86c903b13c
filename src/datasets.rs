//! Hand-authored sample data the visualizations are built around.

use crate::error::JoinlabError;
use crate::model::ColumnType::{Decimal, Integer, Text};
use crate::model::{Column, DatabaseSchema, ForeignKeyRelationship, RelationshipType, Table};
use crate::row;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Dataset {
    /// Customers and their orders.
    Shop,
    /// Artists, albums and songs.
    Music,
    /// The student-enrollment tables after normalization to 3NF.
    Normalization,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Self::Shop, Self::Music, Self::Normalization];

    pub fn name(self) -> &'static str {
        match self {
            Self::Shop => "shop",
            Self::Music => "music",
            Self::Normalization => "normalization",
        }
    }

    pub fn schema(self) -> DatabaseSchema {
        match self {
            Self::Shop => DatabaseSchema::from_tables(vec![customers(), orders()]),
            Self::Music => music_library(),
            Self::Normalization => {
                let scenario = student_enrollment();
                let tables = scenario
                    .steps
                    .last()
                    .map(|s| s.after_tables.clone())
                    .unwrap_or_else(|| vec![scenario.initial_table.clone()]);
                DatabaseSchema::from_tables(tables)
            }
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dataset {
    type Err = JoinlabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| JoinlabError::UnknownDataset(s.to_string()))
    }
}

pub fn customers() -> Table {
    Table::new("customers", "Customers")
        .column(Column::new("customer_id", Integer).primary_key())
        .column(Column::new("name", Text))
        .column(Column::new("city", Text))
        .rows([
            row!("cust-1", { customer_id: 1, name: "Alice", city: "New York" }),
            row!("cust-2", { customer_id: 2, name: "Bob", city: "Chicago" }),
            row!("cust-3", { customer_id: 3, name: "Carol", city: "Boston" }),
            row!("cust-4", { customer_id: 4, name: "Dave", city: "Seattle" }),
            row!("cust-5", { customer_id: 5, name: "Eve", city: "Miami" }),
        ])
}

pub fn orders() -> Table {
    Table::new("orders", "Orders")
        .column(Column::new("order_id", Integer).primary_key())
        .column(Column::new("customer_id", Integer).references("customers", "customer_id"))
        .column(Column::new("product", Text))
        .column(Column::new("amount", Decimal))
        .rows([
            row!("ord-101", { order_id: 101, customer_id: 1, product: "Laptop", amount: 999.99 }),
            row!("ord-102", { order_id: 102, customer_id: 2, product: "Phone", amount: 699.99 }),
            row!("ord-103", { order_id: 103, customer_id: 1, product: "Tablet", amount: 449.99 }),
            row!("ord-104", { order_id: 104, customer_id: 3, product: "Monitor", amount: 349.99 }),
            row!("ord-105", { order_id: 105, customer_id: 2, product: "Keyboard", amount: 79.99 }),
            row!("ord-106", { order_id: 106, customer_id: 99, product: "Mouse", amount: 29.99 }),
        ])
}

pub fn music_library() -> DatabaseSchema {
    let artists = Table::new("artists", "Artists")
        .at(0.0, 200.0)
        .column(Column::new("artist_id", Integer).primary_key())
        .column(Column::new("name", Text))
        .column(Column::new("genre", Text))
        .column(Column::new("country", Text))
        .rows([
            row!("artist-1", { artist_id: 1, name: "Taylor Swift", genre: "Pop", country: "USA" }),
            row!("artist-2", { artist_id: 2, name: "Radiohead", genre: "Alternative", country: "UK" }),
            row!("artist-3", { artist_id: 3, name: "Kendrick Lamar", genre: "Hip-Hop", country: "USA" }),
            row!("artist-4", { artist_id: 4, name: "Adele", genre: "Pop", country: "UK" }),
            row!("artist-5", { artist_id: 5, name: "Daft Punk", genre: "Electronic", country: "France" }),
        ]);

    let albums = Table::new("albums", "Albums")
        .at(350.0, 200.0)
        .column(Column::new("album_id", Integer).primary_key())
        .column(Column::new("title", Text))
        .column(Column::new("release_year", Integer))
        .column(Column::new("artist_id", Integer).references("artists", "artist_id"))
        .rows([
            row!("album-1", { album_id: 1, title: "1989", release_year: 2014, artist_id: 1 }),
            row!("album-2", { album_id: 2, title: "OK Computer", release_year: 1997, artist_id: 2 }),
            row!("album-3", { album_id: 3, title: "DAMN.", release_year: 2017, artist_id: 3 }),
            row!("album-4", { album_id: 4, title: "25", release_year: 2015, artist_id: 4 }),
            row!("album-5", { album_id: 5, title: "Random Access Memories", release_year: 2013, artist_id: 5 }),
            row!("album-6", { album_id: 6, title: "Midnights", release_year: 2022, artist_id: 1 }),
            row!("album-7", { album_id: 7, title: "Kid A", release_year: 2000, artist_id: 2 }),
            row!("album-8", { album_id: 8, title: "21", release_year: 2011, artist_id: 4 }),
        ]);

    let songs = Table::new("songs", "Songs")
        .at(700.0, 200.0)
        .column(Column::new("song_id", Integer).primary_key())
        .column(Column::new("title", Text))
        .column(Column::new("duration_seconds", Integer))
        .column(Column::new("track_number", Integer))
        .column(Column::new("album_id", Integer).references("albums", "album_id"))
        .rows([
            row!("song-1", { song_id: 1, title: "Shake It Off", duration_seconds: 219, track_number: 6, album_id: 1 }),
            row!("song-2", { song_id: 2, title: "Blank Space", duration_seconds: 231, track_number: 2, album_id: 1 }),
            row!("song-3", { song_id: 3, title: "Paranoid Android", duration_seconds: 386, track_number: 2, album_id: 2 }),
            row!("song-4", { song_id: 4, title: "Karma Police", duration_seconds: 264, track_number: 6, album_id: 2 }),
            row!("song-5", { song_id: 5, title: "HUMBLE.", duration_seconds: 177, track_number: 8, album_id: 3 }),
            row!("song-6", { song_id: 6, title: "DNA.", duration_seconds: 185, track_number: 2, album_id: 3 }),
            row!("song-7", { song_id: 7, title: "Hello", duration_seconds: 295, track_number: 1, album_id: 4 }),
            row!("song-8", { song_id: 8, title: "When We Were Young", duration_seconds: 290, track_number: 3, album_id: 4 }),
            row!("song-9", { song_id: 9, title: "Get Lucky", duration_seconds: 369, track_number: 8, album_id: 5 }),
            row!("song-10", { song_id: 10, title: "Instant Crush", duration_seconds: 337, track_number: 5, album_id: 5 }),
            row!("song-11", { song_id: 11, title: "Anti-Hero", duration_seconds: 200, track_number: 3, album_id: 6 }),
            row!("song-12", { song_id: 12, title: "Lavender Haze", duration_seconds: 202, track_number: 1, album_id: 6 }),
            row!("song-13", { song_id: 13, title: "Everything in Its Right Place", duration_seconds: 250, track_number: 1, album_id: 7 }),
            row!("song-14", { song_id: 14, title: "Rolling in the Deep", duration_seconds: 228, track_number: 1, album_id: 8 }),
            row!("song-15", { song_id: 15, title: "Someone Like You", duration_seconds: 285, track_number: 4, album_id: 8 }),
        ]);

    DatabaseSchema {
        tables: vec![artists, albums, songs],
        relationships: vec![
            ForeignKeyRelationship {
                id: "rel-artist-album".to_string(),
                source_table_id: "albums".to_string(),
                source_column_id: "artist_id".to_string(),
                target_table_id: "artists".to_string(),
                target_column_id: "artist_id".to_string(),
                typ: RelationshipType::OneToMany,
            },
            ForeignKeyRelationship {
                id: "rel-album-song".to_string(),
                source_table_id: "songs".to_string(),
                source_column_id: "album_id".to_string(),
                target_table_id: "albums".to_string(),
                target_column_id: "album_id".to_string(),
                typ: RelationshipType::OneToMany,
            },
        ],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalForm {
    #[serde(rename = "UNF")]
    Unnormalized,
    #[serde(rename = "1NF")]
    First,
    #[serde(rename = "2NF")]
    Second,
    #[serde(rename = "3NF")]
    Third,
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unnormalized => "UNF",
            Self::First => "1NF",
            Self::Second => "2NF",
            Self::Third => "3NF",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Update,
    Delete,
    Insert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub title: String,
    pub description: String,
    /// Row indexes into the scenario's initial table.
    pub affected_rows: Vec<usize>,
    pub affected_columns: Vec<String>,
}

/// One normalization stage: fixed before/after snapshots, not computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationStep {
    pub from_form: NormalForm,
    pub to_form: NormalForm,
    pub title: String,
    pub explanation: String,
    pub problem: String,
    pub before_tables: Vec<Table>,
    pub after_tables: Vec<Table>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationScenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub initial_table: Table,
    pub steps: Vec<NormalizationStep>,
    pub anomalies: Vec<Anomaly>,
}

// (student_id, name, courses, department, dept_phone, professor, prof_office)
const STUDENTS: [(&str, &str, &str, &str, &str, &str, &str); 6] = [
    ("1", "Alice", "Math, Physics", "Science", "555-0100", "Dr. Smith", "Room 201"),
    ("2", "Bob", "Math, English", "Science", "555-0100", "Dr. Smith", "Room 201"),
    ("3", "Charlie", "English, Art", "Arts", "555-0200", "Dr. Jones", "Room 305"),
    ("4", "Diana", "Physics, Chemistry", "Science", "555-0100", "Dr. Smith", "Room 201"),
    ("5", "Eve", "Art, Music", "Arts", "555-0200", "Dr. Jones", "Room 305"),
    ("6", "Frank", "Chemistry", "Science", "555-0100", "Dr. Brown", "Room 102"),
];

const DEPARTMENTS: [(&str, &str, &str, &str); 2] = [
    ("Science", "555-0100", "Dr. Smith", "Room 201"),
    ("Arts", "555-0200", "Dr. Jones", "Room 305"),
];

const PROFESSORS: [(&str, &str); 3] = [
    ("Dr. Smith", "Room 201"),
    ("Dr. Jones", "Room 305"),
    ("Dr. Brown", "Room 102"),
];

fn text(name: &str) -> Column {
    Column::new(name, Text)
}

fn initial_enrollment_table() -> Table {
    Table::new("student_enrollment_unnormalized", "StudentEnrollment")
        .column(text("student_id").primary_key())
        .column(text("student_name"))
        .column(text("courses"))
        .column(text("department"))
        .column(text("dept_phone"))
        .column(text("professor"))
        .column(text("prof_office"))
        .rows(STUDENTS.iter().enumerate().map(|(i, s)| {
            row!(format!("row-{i}"), {
                student_id: s.0,
                student_name: s.1,
                courses: s.2,
                department: s.3,
                dept_phone: s.4,
                professor: s.5,
                prof_office: s.6,
            })
        }))
}

/// Students, with department data either inline (1NF) or referenced by
/// department name in `departments_<form>`.
fn students_table(form: &str) -> Table {
    let mut table = Table::new(format!("students_{form}"), "Students")
        .column(text("student_id").primary_key())
        .column(text("student_name"));

    if form == "1nf" {
        table = table
            .column(text("department"))
            .column(text("dept_phone"))
            .column(text("professor"))
            .column(text("prof_office"));
    } else {
        table = table.column(text("department").references(format!("departments_{form}"), "department"));
    }

    table.rows(STUDENTS.iter().enumerate().map(|(i, s)| {
        let r = row!(format!("s{form}-{}", i + 1), {
            student_id: s.0,
            student_name: s.1,
            department: s.3,
        });
        if form == "1nf" {
            r.with("dept_phone", s.4).with("professor", s.5).with("prof_office", s.6)
        } else {
            r
        }
    }))
}

fn enrollments_table(form: &str) -> Table {
    let enrollments = STUDENTS
        .iter()
        .flat_map(|s| s.2.split(", ").map(move |course| (s.0, course)));

    Table::new(format!("enrollments_{form}"), "Enrollments")
        .column(text("enrollment_id").primary_key())
        .column(text("student_id").references(format!("students_{form}"), "student_id"))
        .column(text("course_name"))
        .rows(enrollments.enumerate().map(|(i, (student, course))| {
            row!(format!("e{form}-{}", i + 1), {
                enrollment_id: (i + 1).to_string(),
                student_id: student,
                course_name: course,
            })
        }))
}

fn departments_table(form: &str) -> Table {
    let mut table = Table::new(format!("departments_{form}"), "Departments")
        .column(text("department").primary_key())
        .column(text("dept_phone"));

    table = if form == "2nf" {
        table.column(text("professor")).column(text("prof_office"))
    } else {
        table.column(text("professor").references(format!("professors_{form}"), "professor"))
    };

    table.rows(DEPARTMENTS.iter().enumerate().map(|(i, d)| {
        let r = row!(format!("d{form}-{}", i + 1), {
            department: d.0,
            dept_phone: d.1,
            professor: d.2,
        });
        if form == "2nf" { r.with("prof_office", d.3) } else { r }
    }))
}

fn professors_table(form: &str) -> Table {
    Table::new(format!("professors_{form}"), "Professors")
        .column(text("professor").primary_key())
        .column(text("prof_office"))
        .rows(PROFESSORS.iter().enumerate().map(|(i, p)| {
            row!(format!("p{form}-{}", i + 1), { professor: p.0, prof_office: p.1 })
        }))
}

pub fn student_enrollment() -> NormalizationScenario {
    let initial = initial_enrollment_table();

    let first = vec![students_table("1nf"), enrollments_table("1nf")];
    let second = vec![students_table("2nf"), departments_table("2nf"), enrollments_table("2nf")];
    let third = vec![
        students_table("3nf"),
        departments_table("3nf"),
        professors_table("3nf"),
        enrollments_table("3nf"),
    ];

    let all_columns: Vec<String> = initial.columns.iter().map(|c| c.name.clone()).collect();

    NormalizationScenario {
        id: "student-enrollment".to_string(),
        name: "Student Enrollment".to_string(),
        description: "A denormalized student enrollment table that contains repeating groups, \
            partial dependencies, and transitive dependencies. Walk through the normalization \
            process from UNF to 3NF."
            .to_string(),
        anomalies: vec![
            Anomaly {
                kind: AnomalyKind::Update,
                title: "Change the Science department phone number".to_string(),
                description: "The Science department phone number \"555-0100\" is duplicated across \
                    four rows. Updating it requires changing every row where department is Science, \
                    risking inconsistency if any row is missed."
                    .to_string(),
                affected_rows: vec![0, 1, 3, 5],
                affected_columns: vec!["dept_phone".to_string()],
            },
            Anomaly {
                kind: AnomalyKind::Delete,
                title: "Delete Frank (the only Chemistry-only student)".to_string(),
                description: "Frank is the only student enrolled solely in Chemistry. Deleting his row \
                    also removes the fact that Dr. Brown's office is Room 102, losing professor \
                    information unrelated to the student."
                    .to_string(),
                affected_rows: vec![5],
                affected_columns: all_columns,
            },
            Anomaly {
                kind: AnomalyKind::Insert,
                title: "Add a new department \"Engineering\" with no students yet".to_string(),
                description: "There is no way to record a new department (e.g., Engineering with phone \
                    555-0300) without also inserting a student, because student_id is the primary key \
                    and cannot be null."
                    .to_string(),
                affected_rows: vec![],
                affected_columns: vec![],
            },
        ],
        steps: vec![
            NormalizationStep {
                from_form: NormalForm::Unnormalized,
                to_form: NormalForm::First,
                title: "Eliminate Repeating Groups".to_string(),
                problem: "The 'courses' column contains comma-separated values, violating first normal form."
                    .to_string(),
                explanation: "Each cell should contain exactly one value. We split multi-value cells into \
                    separate rows, creating a proper Enrollments table."
                    .to_string(),
                before_tables: vec![initial.clone()],
                after_tables: first.clone(),
            },
            NormalizationStep {
                from_form: NormalForm::First,
                to_form: NormalForm::Second,
                title: "Remove Partial Dependencies".to_string(),
                problem: "In the Students table, department/dept_phone/professor/prof_office don't depend \
                    on student_id alone; they depend on department."
                    .to_string(),
                explanation: "We separate data that doesn't fully depend on the primary key into its own table."
                    .to_string(),
                before_tables: first,
                after_tables: second.clone(),
            },
            NormalizationStep {
                from_form: NormalForm::Second,
                to_form: NormalForm::Third,
                title: "Remove Transitive Dependencies".to_string(),
                problem: "In Departments, prof_office depends on professor, not directly on department. \
                    This is a transitive dependency."
                    .to_string(),
                explanation: "We extract professor information into its own table to eliminate the chain: \
                    department -> professor -> prof_office."
                    .to_string(),
                before_tables: second,
                after_tables: third,
            },
        ],
        initial_table: initial,
    }
}
