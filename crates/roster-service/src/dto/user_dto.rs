//! User-related DTOs.
//!
//! `UserResponse` is also the shape stored in the cache, so its serialized
//! form must stay compatible with entries already written.

use chrono::{DateTime, Utc};
use roster_core::{NewUser, User, UserChanges, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(
        email(message = "Invalid email address"),
        length(max = 100, message = "Email cannot exceed 100 characters")
    )]
    pub email: String,

    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: i32,
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            age: request.age,
        }
    }
}

/// Request to update a user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(
        email(message = "Invalid email address"),
        length(max = 100, message = "Email cannot exceed 100 characters")
    )]
    pub email: Option<String>,

    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<i32>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            age: request.age,
        }
    }
}

/// User response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            age: user.age,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Total number of stored users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CountResponse {
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(name: &str, email: &str, age: i32) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            age,
        }
    }

    #[test]
    fn test_create_user_request_valid() {
        assert!(create_request("Alice", "alice@example.com", 30).validate().is_ok());
        assert!(create_request("A", "a@x.com", 0).validate().is_ok());
        assert!(create_request("A", "a@x.com", 150).validate().is_ok());
    }

    #[test]
    fn test_create_user_request_empty_name() {
        assert!(create_request("", "a@x.com", 30).validate().is_err());
    }

    #[test]
    fn test_create_user_request_name_too_long() {
        let name = "n".repeat(101);
        assert!(create_request(&name, "a@x.com", 30).validate().is_err());
        assert!(create_request(&"n".repeat(100), "a@x.com", 30).validate().is_ok());
    }

    #[test]
    fn test_create_user_request_invalid_email() {
        assert!(create_request("A", "not-an-email", 30).validate().is_err());
    }

    #[test]
    fn test_create_user_request_age_out_of_range() {
        assert!(create_request("A", "a@x.com", -1).validate().is_err());
        assert!(create_request("A", "a@x.com", 151).validate().is_err());
    }

    #[test]
    fn test_update_user_request_partial() {
        let request = UpdateUserRequest {
            age: Some(31),
            ..UpdateUserRequest::default()
        };
        assert!(request.validate().is_ok());
        assert!(UpdateUserRequest::default().validate().is_ok());
    }

    #[test]
    fn test_update_user_request_checks_supplied_fields() {
        let request = UpdateUserRequest {
            email: Some("nope".to_string()),
            age: Some(200),
            ..UpdateUserRequest::default()
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_update_request_into_changes() {
        let changes: UserChanges = UpdateUserRequest {
            name: Some("B".to_string()),
            ..UpdateUserRequest::default()
        }
        .into();
        assert_eq!(changes.name.as_deref(), Some("B"));
        assert!(changes.email.is_none());
        assert!(changes.age.is_none());
    }

    #[test]
    fn test_user_response_json_shape() {
        let now = Utc::now();
        let response = UserResponse::from(User {
            id: UserId(7),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            age: 30,
            created_at: now,
            updated_at: now,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["age"], 30);
        assert!(json["created_at"].is_string());

        let parsed: UserResponse = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, response);
    }
}
