//! OpenAPI fragment for the books module, merged by the HTTP facade.

use serde_json::{json, Value};

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn book_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn book_list_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "array",
                    "items": { "$ref": "#/components/schemas/Book" }
                }
            }
        }
    })
}

fn path_param(name: &str, schema_type: &str, description: &str) -> Value {
    let schema = if schema_type == "integer" {
        json!({ "type": "integer", "format": "int64" })
    } else {
        json!({ "type": schema_type })
    };
    json!({
        "name": name,
        "in": "path",
        "required": true,
        "description": description,
        "schema": schema
    })
}

fn book_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookInput" }
            }
        }
    })
}

fn list_by(param: &str, summary: &str) -> Value {
    json!({
        "get": {
            "summary": summary,
            "tags": ["Books"],
            "parameters": [path_param(param, "string", summary)],
            "responses": { "200": book_list_response("Matching books, possibly empty") }
        }
    })
}

fn copy_operation(summary: &str, conflict: &str) -> Value {
    json!({
        "put": {
            "summary": summary,
            "tags": ["Books"],
            "parameters": [path_param("id", "integer", "Book identifier")],
            "responses": {
                "200": book_response("Updated book"),
                "400": error_response(conflict),
                "404": error_response("Book not found")
            }
        }
    })
}

fn book_properties() -> Value {
    json!({
        "title": { "type": "string" },
        "author": { "type": "string" },
        "isbn": { "type": "string", "description": "Unique across the catalog" },
        "genre": { "type": "string" },
        "publishedYear": { "type": "integer", "format": "int32" },
        "publisher": { "type": "string" },
        "description": { "type": "string", "maxLength": 1000 },
        "totalCopies": { "type": "integer", "format": "int32", "minimum": 0 },
        "availableCopies": { "type": "integer", "format": "int32", "minimum": 0 }
    })
}

pub fn document() -> Value {
    let mut book = book_properties();
    book["id"] = json!({ "type": "integer", "format": "int64" });

    json!({
        "paths": {
            "/": {
                "post": {
                    "summary": "Add a book",
                    "tags": ["Books"],
                    "requestBody": book_body(),
                    "responses": {
                        "201": book_response("Stored book with its assigned id"),
                        "400": error_response("Malformed body or duplicate ISBN"),
                        "422": error_response("Validation error")
                    }
                }
            },
            "/all": {
                "get": {
                    "summary": "List all books",
                    "tags": ["Books"],
                    "responses": { "200": book_list_response("All books") }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book by id",
                    "tags": ["Books"],
                    "parameters": [path_param("id", "integer", "Book identifier")],
                    "responses": {
                        "200": book_response("The book"),
                        "404": error_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Replace a book's fields",
                    "tags": ["Books"],
                    "parameters": [path_param("id", "integer", "Book identifier")],
                    "requestBody": book_body(),
                    "responses": {
                        "200": book_response("Updated book"),
                        "400": error_response("Malformed body or ISBN held by another book"),
                        "404": error_response("Book not found"),
                        "422": error_response("Validation error")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [path_param("id", "integer", "Book identifier")],
                    "responses": {
                        "204": { "description": "Deleted" },
                        "404": error_response("Book not found")
                    }
                }
            },
            "/isbn/{isbn}": {
                "get": {
                    "summary": "Get a book by ISBN",
                    "tags": ["Books"],
                    "parameters": [path_param("isbn", "string", "Exact ISBN")],
                    "responses": {
                        "200": book_response("The book"),
                        "404": error_response("Book not found")
                    }
                }
            },
            "/search/{keyword}": list_by("keyword", "Search titles and genres"),
            "/author/{author}": list_by("author", "Search authors"),
            "/genre/{genre}": list_by("genre", "Books in a genre"),
            "/lend/{id}": copy_operation("Lend one copy", "No copies available"),
            "/return/{id}": copy_operation("Return one copy", "All copies already available"),
            "/{id}/availability": {
                "get": {
                    "summary": "Whether at least one copy is available",
                    "tags": ["Books"],
                    "parameters": [path_param("id", "integer", "Book identifier")],
                    "responses": {
                        "200": {
                            "description": "Availability flag",
                            "content": { "application/json": { "schema": { "type": "boolean" } } }
                        },
                        "404": error_response("Book not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": book,
                    "required": [
                        "id", "title", "author", "isbn", "genre", "publishedYear",
                        "publisher", "totalCopies", "availableCopies"
                    ]
                },
                "BookInput": {
                    "type": "object",
                    "properties": book_properties(),
                    "required": ["title", "author", "isbn", "genre", "publishedYear", "publisher"]
                }
            }
        }
    })
}
