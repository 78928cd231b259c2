mod api_content_router;
mod integration_content_editor;
mod unit_remote_client;
