pub mod admin_endpoints;
pub mod queue_endpoints;
pub mod requests;

use actix_web::web::ServiceConfig;

/// Registers every route; shared by the server and the HTTP tests.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(queue_endpoints::create_queue)
        .service(queue_endpoints::queue_qr)
        .service(queue_endpoints::queue_data)
        .service(queue_endpoints::queue_join)
        .service(queue_endpoints::queue_add)
        .service(queue_endpoints::queue_next)
        .service(queue_endpoints::queue_clear)
        .service(queue_endpoints::queue_delete)
        .service(admin_endpoints::admin_stats)
        .service(admin_endpoints::admin_queues)
        .service(admin_endpoints::clear_last_history)
        .service(admin_endpoints::clear_all_history);
}
