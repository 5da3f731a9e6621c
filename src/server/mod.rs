//! Server-side API backend and business logic.
//!
//! This module contains the complete backend for the bot's companion website,
//! including API endpoints, business logic, data access, and infrastructure services.
//! The backend uses Axum as the web framework, the MongoDB driver for the bot's
//! configuration documents, and Serenity for bot-token Discord lookups.
//!
//! # Architecture
//!
//! The server follows a layered architecture with clear separation of concerns:
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers, access control, and DTO conversion
//! - **Service Layer** (`service/`) - Business logic orchestration between controllers and data layer
//! - **Data Layer** (`data/`) - MongoDB collection access
//! - **Model Layer** (`model/`) - Domain models, submitted forms and typed updates
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//! - **Middleware** (`middleware/`) - Typed session access and authentication guards
//!
//! # Infrastructure
//!
//! Supporting modules provide application infrastructure:
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state (databases, HTTP clients, etc.)
//! - **Startup** (`startup`) - Initialization of databases, sessions, and clients
//! - **Router** (`router`) - Axum route configuration and API documentation
//!
//! # Request Flow
//!
//! A typical request flows through these layers:
//!
//! 1. **Router** receives HTTP request and routes to appropriate controller
//! 2. **Middleware** processes authentication and session management
//! 3. **Controller** checks the session, passes the request to a service
//! 4. **Service** authorizes against Discord, validates forms, orchestrates data operations
//! 5. **Data** queries MongoDB, deserializing documents into domain models
//! 6. **Service** returns domain model to controller
//! 7. **Controller** converts domain model to DTO, returns HTTP response

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod middleware;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
