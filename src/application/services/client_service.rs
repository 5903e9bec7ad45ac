//! Client lifecycle service.

use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{
    Client, ClientMetaPatch, ClientPatch, ClientSituationPatch, NewClient, NewClientMeta,
    NewClientSituation, NewContrat,
};
use crate::domain::repositories::ClientRepository;
use crate::error::AppError;
use crate::utils::date::parse_date;

/// Message returned after a successful delete.
pub const DELETE_CONFIRMATION: &str = "client deleted successfully";

const DATE_FIELD: &str = "date_creation_compte";

/// Data for creating a client, before preprocessing.
///
/// The account date is still raw text; the service parses it.
#[derive(Debug, Clone)]
pub struct CreateClientInput {
    pub date_creation_compte: Option<String>,
    pub client_meta: NewClientMeta,
    pub client_situation: NewClientSituation,
    pub contrats: Vec<NewContrat>,
}

/// Data for a partial update, before preprocessing.
#[derive(Debug, Clone, Default)]
pub struct UpdateClientInput {
    pub date_creation_compte: Option<Option<String>>,
    pub client_meta: ClientMetaPatch,
    pub client_situation: ClientSituationPatch,
    pub contrats: Option<Vec<NewContrat>>,
}

/// Service for single-client create, read, update and delete.
///
/// Each call is one unit of work on the repository. Failures are classified
/// and logged here:
/// - not-found lookups are logged at `warn`
/// - validation and persistence failures at `error`
pub struct ClientService<R: ClientRepository> {
    repository: Arc<R>,
}

impl<R: ClientRepository> ClientService<R> {
    /// Creates a new client service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates a client with its meta, situation and contracts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `date_creation_compte` is not `YYYY-MM-DD`.
    /// Returns [`AppError::Persistence`] (400) if the database rejects the insert.
    pub async fn create_client(&self, input: CreateClientInput) -> Result<Client, AppError> {
        let date_creation_compte = input
            .date_creation_compte
            .as_deref()
            .map(|raw| parse_date(DATE_FIELD, raw))
            .transpose()
            .inspect_err(|e| tracing::error!(error = %e, "Rejected client creation"))?;

        let new_client = NewClient {
            date_creation_compte,
            client_meta: input.client_meta,
            client_situation: input.client_situation,
            contrats: input.contrats,
        };

        let client = self.repository.create(new_client).await.map_err(|e| {
            let e = e.into_persistence(StatusCode::BAD_REQUEST, "Error creating client");
            tracing::error!(error = %e, "Failed to create client");
            e
        })?;

        tracing::info!(client_id = client.id, "Client {} created", client.id);
        Ok(client)
    }

    /// Retrieves a client by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no client has this id.
    pub async fn get_client(&self, id: i64) -> Result<Client, AppError> {
        let client = self.repository.find_by_id(id).await.inspect_err(|e| {
            tracing::error!(client_id = id, error = %e, "Failed to load client");
        })?;

        match client {
            Some(client) => {
                tracing::info!(client_id = id, "Client {} found", id);
                Ok(client)
            }
            None => {
                tracing::warn!(client_id = id, "Client {} not found", id);
                Err(AppError::not_found("client not found", json!({ "id": id })))
            }
        }
    }

    /// Lists clients ordered by id.
    ///
    /// An offset past the last client yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database errors.
    pub async fn list_clients(&self, skip: i64, limit: i64) -> Result<Vec<Client>, AppError> {
        let clients = self.repository.list(skip, limit).await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to list clients");
        })?;

        tracing::info!(count = clients.len(), skip, limit, "Retrieved {} clients", clients.len());
        Ok(clients)
    }

    /// Applies a partial update to an existing client.
    ///
    /// An empty update returns the stored client without opening a write.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no client has this id.
    /// Returns [`AppError::Validation`] if `date_creation_compte` is not `YYYY-MM-DD`.
    /// Returns [`AppError::Persistence`] (400) if the database rejects the update.
    pub async fn update_client(
        &self,
        id: i64,
        input: UpdateClientInput,
    ) -> Result<Client, AppError> {
        let current = self.get_client(id).await?;

        let date_creation_compte = match input.date_creation_compte {
            Some(Some(raw)) => Some(Some(parse_date(DATE_FIELD, &raw).inspect_err(|e| {
                tracing::error!(client_id = id, error = %e, "Rejected client update");
            })?)),
            Some(None) => Some(None),
            None => None,
        };

        let patch = ClientPatch {
            date_creation_compte,
            client_meta: input.client_meta,
            client_situation: input.client_situation,
            contrats: input.contrats,
        };

        if patch.is_empty() {
            tracing::info!(client_id = id, "Empty update for client {}, nothing to write", id);
            return Ok(current);
        }

        let client = self.repository.update(id, patch).await.map_err(|e| {
            let e = e.into_persistence(StatusCode::BAD_REQUEST, "Error updating client");
            tracing::error!(client_id = id, error = %e, "Failed to update client");
            e
        })?;

        tracing::info!(client_id = id, "Client {} updated", id);
        Ok(client)
    }

    /// Deletes a client together with everything it owns.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no client has this id.
    /// Returns [`AppError::Persistence`] (500) if the delete fails.
    pub async fn delete_client(&self, id: i64) -> Result<&'static str, AppError> {
        self.get_client(id).await?;

        self.repository.delete(id).await.map_err(|e| {
            let e = e.into_persistence(StatusCode::INTERNAL_SERVER_ERROR, "Error deleting client");
            tracing::error!(client_id = id, error = %e, "Failed to delete client");
            e
        })?;

        tracing::info!(client_id = id, "Client {} deleted", id);
        Ok(DELETE_CONFIRMATION)
    }

    /// Checks that the underlying database answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}
