#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::openapi::{schema::Schema, PathItemType, RefOr};
    use utoipa::OpenApi;

    fn schema_properties(name: &str) -> Vec<String> {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        match components.schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            _ => panic!("{} should be an object schema", name),
        }
    }

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        assert!(openapi.components.is_some());
        let components = openapi.components.as_ref().unwrap();
        for name in ["ErrorResponse", "HealthResponse", "UserResponse", "TokenResponse", "PlayerResponse"] {
            assert!(components.schemas.contains_key(name), "missing schema {}", name);
        }

        let json_result = serde_json::to_string(&openapi);
        assert!(json_result.is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let properties = schema_properties("ErrorResponse");
        for field in ["error", "code", "success"] {
            assert!(properties.iter().any(|p| p == field));
        }
    }

    #[test]
    fn test_user_response_never_exposes_password() {
        let properties = schema_properties("UserResponse");
        assert!(properties.iter().any(|p| p == "email"));
        assert!(!properties.iter().any(|p| p == "password"));

        let request = schema_properties("CreateUserRequest");
        assert!(request.iter().any(|p| p == "password"));
    }

    #[test]
    fn test_account_paths() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        let user_detail = paths.get("/api/v1/users/{user_id}").unwrap();
        for method in [PathItemType::Get, PathItemType::Put, PathItemType::Delete] {
            let operation = user_detail.operations.get(&method).unwrap();
            assert!(operation.responses.responses.contains_key("403"));
            assert!(operation.responses.responses.contains_key("401"));
        }
        assert!(!user_detail.operations.contains_key(&PathItemType::Post));

        let token = paths.get("/api/v1/auth/token").unwrap();
        assert!(token.operations.contains_key(&PathItemType::Post));
        assert!(token.operations.contains_key(&PathItemType::Delete));
    }

    #[test]
    fn test_openapi_paths_cover_league_data() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        for path in [
            "/health",
            "/api/v1/leagues",
            "/api/v1/clubs/{club_id}/players",
            "/api/v1/positions/{position_id}",
            "/api/v1/players/{player_id}",
            "/api/v1/matches",
        ] {
            assert!(paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_league_data_success_bodies_use_response_wrapper() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        for (path, method, status) in [
            ("/api/v1/leagues", PathItemType::Get, "200"),
            ("/api/v1/clubs", PathItemType::Post, "201"),
            ("/api/v1/clubs/{club_id}/players", PathItemType::Get, "200"),
            ("/api/v1/positions/{position_id}", PathItemType::Put, "200"),
            ("/api/v1/players/{player_id}", PathItemType::Get, "200"),
            ("/api/v1/players/{player_id}", PathItemType::Put, "200"),
            ("/api/v1/matches", PathItemType::Get, "200"),
        ] {
            let operation = paths
                .get(path)
                .and_then(|item| item.operations.get(&method))
                .unwrap_or_else(|| panic!("missing {:?} {}", method, path));
            let response = operation
                .responses
                .responses
                .get(status)
                .unwrap_or_else(|| panic!("missing {} response on {}", status, path));
            let response_json = serde_json::to_string(response).unwrap();
            assert!(
                response_json.contains("ApiResponse"),
                "{:?} {} should describe the ApiResponse wrapper: {}",
                method,
                path,
                response_json
            );
        }
    }

    #[test]
    fn test_all_error_responses_reference_correct_schema() {
        let openapi_json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(!openapi_json.contains("crate.schemas.ErrorResponse"));
        assert!(!openapi_json.contains("crate::schemas::ErrorResponse"));
        assert!(openapi_json.contains("#/components/schemas/ErrorResponse"));
    }
}
