//! RPC Method Handlers
//!
//! Thin translation between RPC types and the core services.

use crate::error::to_rpc_error;
use crate::types::{
    AddNoteRequest, CreateCustomerRequest, CreateCustomerResponse, ExtendLeaseResponse,
    LeaseIdRequest, LeaseIdResponse, ListSimsRequest, NoteChangeResponse, NoteIdRequest,
    NoteIdResponse, ReplaceSimsRequest, ReplaceSimsResponse, ReturnLeaseResponse,
    SearchUnitsRequest, SetSimSetRequest, UnitIdRequest, UnitIdResponse, UpdateNoteRequest,
    UpsertSimRequest, UpsertUnitRequest,
};
use jsonrpsee::types::ErrorObjectOwned;
use rentdesk_core::application::{
    CreateLeaseRequest, ExtendLeaseRequest, InventoryService, LeaseService, SearchService,
};
use rentdesk_core::domain::{
    ActiveLease, Customer, DueTodayEntry, LeaseExtension, LeaseHistoryEntry, Note, Sim, Unit,
    UnitWithActiveLease,
};
use std::sync::Arc;

type RpcResult<T> = Result<T, ErrorObjectOwned>;

/// RPC Handler with injected services
pub struct RpcHandler {
    leases: Arc<LeaseService>,
    search: Arc<SearchService>,
    inventory: Arc<InventoryService>,
}

impl RpcHandler {
    pub fn new(
        leases: Arc<LeaseService>,
        search: Arc<SearchService>,
        inventory: Arc<InventoryService>,
    ) -> Self {
        Self {
            leases,
            search,
            inventory,
        }
    }

    /// units.search.v1
    pub async fn search_units(
        &self,
        params: SearchUnitsRequest,
    ) -> RpcResult<Vec<UnitWithActiveLease>> {
        self.search
            .search_units(&params.query, params.customer_id)
            .await
            .map_err(to_rpc_error)
    }

    /// units.upsert.v1
    pub async fn upsert_unit(&self, params: UpsertUnitRequest) -> RpcResult<UnitIdResponse> {
        let unit_id = self
            .inventory
            .upsert_unit(
                &params.serial_number,
                params.model.as_deref(),
                params.sim_set_number,
            )
            .await
            .map_err(to_rpc_error)?;
        Ok(UnitIdResponse { unit_id })
    }

    /// units.list.v1
    pub async fn list_units(&self) -> RpcResult<Vec<Unit>> {
        self.inventory.list_units().await.map_err(to_rpc_error)
    }

    /// units.set_sim_set.v1
    pub async fn set_sim_set(&self, params: SetSimSetRequest) -> RpcResult<UnitIdResponse> {
        self.inventory
            .set_sim_set_number(params.unit_id, params.sim_set_number)
            .await
            .map_err(to_rpc_error)?;
        Ok(UnitIdResponse {
            unit_id: params.unit_id,
        })
    }

    /// customers.create.v1
    pub async fn create_customer(
        &self,
        params: CreateCustomerRequest,
    ) -> RpcResult<CreateCustomerResponse> {
        let name = self
            .inventory
            .create_customer(&params.name)
            .await
            .map_err(to_rpc_error)?;
        Ok(CreateCustomerResponse { name })
    }

    /// customers.list.v1
    pub async fn list_customers(&self) -> RpcResult<Vec<Customer>> {
        self.inventory.list_customers().await.map_err(to_rpc_error)
    }

    /// leases.create.v1
    pub async fn create_lease(&self, params: CreateLeaseRequest) -> RpcResult<LeaseIdResponse> {
        let lease_id = self
            .leases
            .create_lease(params)
            .await
            .map_err(to_rpc_error)?;
        Ok(LeaseIdResponse { lease_id })
    }

    /// leases.extend.v1
    ///
    /// Policy rejections come back as `ok: false`, not as RPC errors.
    pub async fn extend_lease(&self, params: ExtendLeaseRequest) -> RpcResult<ExtendLeaseResponse> {
        let outcome = self
            .leases
            .extend_lease(params)
            .await
            .map_err(to_rpc_error)?;
        Ok(ExtendLeaseResponse::from(outcome))
    }

    /// leases.return.v1
    pub async fn return_lease(&self, params: LeaseIdRequest) -> RpcResult<ReturnLeaseResponse> {
        self.leases
            .cancel_lease(params.lease_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(ReturnLeaseResponse {
            lease_id: params.lease_id,
            returned: true,
        })
    }

    /// leases.active.v1
    pub async fn active_leases(&self) -> RpcResult<Vec<ActiveLease>> {
        self.leases.load_active_leases().await.map_err(to_rpc_error)
    }

    /// leases.due_today.v1
    pub async fn due_today(&self) -> RpcResult<Vec<DueTodayEntry>> {
        self.leases.due_today().await.map_err(to_rpc_error)
    }

    /// leases.history.v1
    pub async fn lease_history(&self, params: UnitIdRequest) -> RpcResult<Vec<LeaseHistoryEntry>> {
        self.leases
            .unit_history(params.unit_id)
            .await
            .map_err(to_rpc_error)
    }

    /// leases.extensions.v1
    pub async fn lease_extensions(&self, params: LeaseIdRequest) -> RpcResult<Vec<LeaseExtension>> {
        self.leases
            .lease_extensions(params.lease_id)
            .await
            .map_err(to_rpc_error)
    }

    /// sims.list.v1
    pub async fn list_sims(&self, params: ListSimsRequest) -> RpcResult<Vec<Sim>> {
        if params.grid {
            let grid = self
                .inventory
                .sim_grid(params.unit_id)
                .await
                .map_err(to_rpc_error)?;
            return Ok(grid.into_inner());
        }
        self.inventory
            .load_sims(params.unit_id)
            .await
            .map_err(to_rpc_error)
    }

    /// sims.replace.v1
    pub async fn replace_sims(&self, params: ReplaceSimsRequest) -> RpcResult<ReplaceSimsResponse> {
        let slots = params.sims.len();
        self.inventory
            .replace_sims(params.unit_id, params.sims)
            .await
            .map_err(to_rpc_error)?;
        Ok(ReplaceSimsResponse {
            unit_id: params.unit_id,
            slots,
        })
    }

    /// sims.upsert.v1
    pub async fn upsert_sim(&self, params: UpsertSimRequest) -> RpcResult<UnitIdResponse> {
        let sim = Sim {
            slot: params.slot,
            imei: params.imei,
            vendor: params.vendor,
        };
        self.inventory
            .upsert_sim(params.unit_id, sim)
            .await
            .map_err(to_rpc_error)?;
        Ok(UnitIdResponse {
            unit_id: params.unit_id,
        })
    }

    /// notes.add.v1
    pub async fn add_note(&self, params: AddNoteRequest) -> RpcResult<NoteIdResponse> {
        let note_id = self
            .inventory
            .add_note(params.unit_id, &params.text, params.author.as_deref())
            .await
            .map_err(to_rpc_error)?;
        Ok(NoteIdResponse { note_id })
    }

    /// notes.list.v1
    pub async fn list_notes(&self, params: UnitIdRequest) -> RpcResult<Vec<Note>> {
        self.inventory
            .list_notes(params.unit_id)
            .await
            .map_err(to_rpc_error)
    }

    /// notes.update.v1
    pub async fn update_note(&self, params: UpdateNoteRequest) -> RpcResult<NoteChangeResponse> {
        let changed = self
            .inventory
            .update_note(params.note_id, &params.text)
            .await
            .map_err(to_rpc_error)?;
        Ok(NoteChangeResponse {
            note_id: params.note_id,
            changed,
        })
    }

    /// notes.delete.v1
    pub async fn delete_note(&self, params: NoteIdRequest) -> RpcResult<NoteChangeResponse> {
        let changed = self
            .inventory
            .delete_note(params.note_id)
            .await
            .map_err(to_rpc_error)?;
        Ok(NoteChangeResponse {
            note_id: params.note_id,
            changed,
        })
    }
}
