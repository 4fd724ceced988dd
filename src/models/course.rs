//! Course model

use std::sync::OnceLock;

use serde_json::json;

use super::{Relation, Resource};
use crate::schema::{FieldDef, Schema};

/// Accepted `minimumSkill` values
pub const SKILL_LEVELS: [&str; 3] = ["beginner", "intermediate", "advanced"];

/// Field on a course referencing its bootcamp
pub const BOOTCAMP_FIELD: &str = "bootcamp";

/// Field averaged into the bootcamp's `averageCost`
pub const TUITION_FIELD: &str = "tuition";

/// Owning bootcamp, reduced to its name and description
pub const BOOTCAMP: Relation = Relation::Parent {
    path: BOOTCAMP_FIELD,
    collection: super::bootcamp::Bootcamp::COLLECTION,
    select: Some(&["name", "description"]),
};

/// Course resource
pub struct Course;

impl Resource for Course {
    const COLLECTION: &'static str = "courses";
    const LABEL: &'static str = "Course";

    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(build_schema)
    }
}

fn build_schema() -> Schema {
    Schema::new(Course::LABEL)
        .field(
            "title",
            FieldDef::string().trim().required("Please add a course title"),
        )
        .field(
            "description",
            FieldDef::string().required("Please add a description"),
        )
        .field(
            "weeks",
            FieldDef::string().required("Please add number of weeks"),
        )
        .field(
            TUITION_FIELD,
            FieldDef::number()
                .required("Please add a tuition cost")
                .min(0.0, "Tuition can not be negative"),
        )
        .field(
            "minimumSkill",
            FieldDef::string()
                .required("Please add a minimum skill")
                .one_of(
                    &SKILL_LEVELS,
                    "Minimum skill must be beginner, intermediate or advanced",
                ),
        )
        .field(
            "scholarshipAvailable",
            FieldDef::boolean().default_value(json!(false)),
        )
        .field("createdAt", FieldDef::date().default_now().internal())
        .field(BOOTCAMP_FIELD, FieldDef::reference().internal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaValidator;

    #[test]
    fn test_schema_casts_course() {
        let doc = SchemaValidator::new(Course::schema())
            .prepare_create(json!({
                "title": " Front End Web Development ",
                "description": "HTML, CSS and JavaScript",
                "weeks": 8,
                "tuition": "8000",
                "minimumSkill": "beginner"
            }))
            .unwrap();

        assert_eq!(doc["title"], "Front End Web Development");
        assert_eq!(doc["weeks"], "8");
        assert_eq!(doc["tuition"], json!(8000));
        assert_eq!(doc["scholarshipAvailable"], json!(false));
    }

    #[test]
    fn test_schema_rejects_unknown_skill() {
        let err = SchemaValidator::new(Course::schema())
            .prepare_create(json!({
                "title": "Course",
                "description": "d",
                "weeks": "4",
                "tuition": 100,
                "minimumSkill": "expert"
            }))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Minimum skill must be beginner, intermediate or advanced"
        );
    }

    #[test]
    fn test_bootcamp_reference_cannot_come_from_body() {
        let doc = SchemaValidator::new(Course::schema())
            .prepare_update(json!({"bootcamp": "5d713995b721c3bb38c1f5d0"}))
            .unwrap();
        assert!(doc.is_empty());
    }
}
