// src/server/openapi.rs
// =============================================================================
// OpenAPI 3.0 description served at /openapi.json.
// =============================================================================

use serde_json::{json, Value};

use crate::config::{DEFAULT_LINK_LIMIT, LINK_CONCURRENCY, MAX_LINK_LIMIT};

pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "llms.txt Validator API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": format!(
                "Validate and analyze llms.txt files (https://llmstxt.org) with deep link checking. \
                 Linked documents are checked with at most {} simultaneous requests. \
                 Links to llms-full.txt on the same hostname are ignored.",
                LINK_CONCURRENCY
            ),
        },
        "paths": {
            "/check": {
                "get": {
                    "summary": "Validate and analyze an llms.txt file",
                    "parameters": [
                        {
                            "name": "url",
                            "in": "query",
                            "required": true,
                            "description": "Full URL of the llms.txt file. Must use HTTPS and have the path /llms.txt.",
                            "schema": { "type": "string", "format": "uri", "example": "https://example.com/llms.txt" }
                        },
                        {
                            "name": "limit",
                            "in": "query",
                            "required": false,
                            "description": format!(
                                "Maximum number of links to sample and check. Default: {}, maximum: {} (larger values are clamped).",
                                DEFAULT_LINK_LIMIT, MAX_LINK_LIMIT
                            ),
                            "schema": { "type": "integer", "minimum": 1, "maximum": MAX_LINK_LIMIT, "default": DEFAULT_LINK_LIMIT }
                        }
                    ],
                    "responses": {
                        "200": {
                            "description": "Validation ran. The document may still be invalid; see `valid`.",
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ValidationResult" } } }
                        },
                        "400": {
                            "description": "Missing url parameter or bad limit value",
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Rejection" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Rejection": {
                    "type": "object",
                    "properties": {
                        "valid": { "type": "boolean", "example": false },
                        "errors": { "type": "array", "items": { "type": "string" }, "example": ["URL parameter is required"] },
                        "warnings": { "type": "array", "items": { "type": "string" } }
                    }
                },
                "ValidationResult": {
                    "type": "object",
                    "required": ["valid", "errors", "warnings", "parsed", "linkResults", "metadata"],
                    "properties": {
                        "valid": { "type": "boolean" },
                        "errors": { "type": "array", "items": { "type": "string" } },
                        "warnings": { "type": "array", "items": { "type": "string" } },
                        "parsed": { "type": "object", "nullable": true },
                        "linkResults": { "type": "array", "items": { "$ref": "#/components/schemas/LinkCheckResult" } },
                        "metadata": { "$ref": "#/components/schemas/Metadata" }
                    }
                },
                "LinkCheckResult": {
                    "type": "object",
                    "properties": {
                        "url": { "type": "string" },
                        "valid": { "type": "boolean" },
                        "tokens": { "type": "integer" },
                        "contentType": { "type": "string" },
                        "failReason": { "type": "string" },
                        "ignored": { "type": "boolean" },
                        "failure": {
                            "type": "object",
                            "properties": {
                                "kind": {
                                    "type": "string",
                                    "enum": [
                                        "invalid_scheme", "timeout", "network", "http_status",
                                        "unexpected", "invalid_content_type", "too_large"
                                    ]
                                }
                            }
                        }
                    }
                },
                "Metadata": {
                    "type": "object",
                    "nullable": true,
                    "properties": {
                        "sizeTokens": { "type": "integer" },
                        "contentType": { "type": "string" },
                        "linkCount": { "type": "integer" },
                        "tokensInLlmsTxt": { "type": "integer" },
                        "checkedLinkCount": { "type": "integer" },
                        "ignoredLinkCount": { "type": "integer" },
                        "validLinkCount": { "type": "integer" },
                        "validPercentage": { "type": "number" },
                        "textPlainOrMarkdownCount": { "type": "integer" },
                        "otherContentTypeCount": { "type": "integer" },
                        "minLinkedDocTokens": { "type": "integer", "nullable": true },
                        "maxLinkedDocTokens": { "type": "integer", "nullable": true },
                        "avgLinkedDocTokens": { "type": "integer", "nullable": true },
                        "sectionCount": { "type": "integer" },
                        "avgDescriptionLength": { "type": "integer" },
                        "hasDescription": { "type": "boolean" },
                        "hasDetails": { "type": "boolean" }
                    }
                }
            }
        }
    })
}
