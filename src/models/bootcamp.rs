//! Bootcamp model

use std::sync::OnceLock;

use regex::Regex;
use serde_json::json;

use super::{Relation, Resource};
use crate::schema::{FieldDef, FieldType, Schema};

/// Career tracks a bootcamp may offer
pub const CAREERS: [&str; 6] = [
    "Web Development",
    "Mobile Development",
    "UI/UX",
    "Data Science",
    "Business",
    "Other",
];

/// Photo stored until one is uploaded
pub const DEFAULT_PHOTO: &str = "no-photo.jpg";

const URL_PATTERN: &str = r"^https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)$";
const EMAIL_PATTERN: &str = r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$";

/// Courses offered by a bootcamp
pub const COURSES: Relation = Relation::Children {
    path: "courses",
    collection: super::course::Course::COLLECTION,
    foreign_field: "bootcamp",
    select: None,
};

/// Bootcamp resource
pub struct Bootcamp;

impl Resource for Bootcamp {
    const COLLECTION: &'static str = "bootcamps";
    const LABEL: &'static str = "Bootcamp";

    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(build_schema)
    }
}

fn build_schema() -> Schema {
    let url = Regex::new(URL_PATTERN).expect("URL pattern is valid");
    let email = Regex::new(EMAIL_PATTERN).expect("email pattern is valid");

    Schema::new(Bootcamp::LABEL)
        .field(
            "name",
            FieldDef::string()
                .required("Please add a name")
                .unique()
                .trim()
                .max_length(50, "Name can not be more than 50 characters"),
        )
        .field("slug", FieldDef::string().internal())
        .field(
            "description",
            FieldDef::string()
                .required("Please add a description")
                .max_length(500, "Description can not be more than 500 characters"),
        )
        .field(
            "website",
            FieldDef::string().matching(url, "Please use a valid URL with HTTP or HTTPS"),
        )
        .field(
            "phone",
            FieldDef::string().max_length(20, "Phone number can not be longer than 20 characters"),
        )
        .field("email", FieldDef::string().matching(email, "Please add a valid email"))
        .field("address", FieldDef::string().required("Please add an address"))
        .field("location", FieldDef::object().internal())
        .field(
            "careers",
            FieldDef::array(FieldType::String)
                .required("Please add at least one career")
                .one_of(
                    &CAREERS,
                    format!("Careers must be among: {}", CAREERS.join(", ")),
                ),
        )
        .field(
            "averageRating",
            FieldDef::number()
                .min(1.0, "Rating must be at least 1")
                .max(10.0, "Rating can not be more than 10"),
        )
        .field("averageCost", FieldDef::number().internal())
        .field(
            "photo",
            FieldDef::string().default_value(json!(DEFAULT_PHOTO)).internal(),
        )
        .field("housing", FieldDef::boolean().default_value(json!(false)))
        .field("jobAssistance", FieldDef::boolean().default_value(json!(false)))
        .field("jobGuarantee", FieldDef::boolean().default_value(json!(false)))
        .field("acceptGi", FieldDef::boolean().default_value(json!(false)))
        .field("createdAt", FieldDef::date().default_now().internal())
}

/// URL-friendly form of a bootcamp name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
