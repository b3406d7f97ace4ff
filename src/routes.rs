use crate::{
    api::{assistant, audit, employee, leave_request, payroll, tenant},
    auth::handlers,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter config
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let auth_limiter = build_limiter(config.rate_auth_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/request-code")
                    .wrap(Governor::new(&auth_limiter))
                    .route(web::post().to(handlers::request_code)),
            )
            .service(
                web::resource("/verify")
                    .wrap(Governor::new(&auth_limiter))
                    .route(web::post().to(handlers::verify_code)),
            ),
    );
    cfg.service(
        web::resource("/tenants")
            .wrap(Governor::new(&auth_limiter))
            .route(web::post().to(tenant::create_tenant)),
    );

    // Protected routes (token-gated via the AuthUser extractor)
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Governor::new(&protected_limiter)) // rate limiting
            .service(web::resource("/tenants").route(web::get().to(tenant::list_tenants)))
            .service(web::resource("/assistant").route(web::post().to(assistant::generate)))
            .service(
                web::scope("/tenants/{tenant_id}")
                    .service(
                        web::resource("/compliance")
                            .route(web::get().to(tenant::get_compliance))
                            .route(web::put().to(tenant::put_compliance)),
                    )
                    .service(
                        web::scope("/employees")
                            // /employees
                            .service(
                                web::resource("")
                                    .route(web::post().to(employee::create_employee))
                                    .route(web::get().to(employee::list_employees)),
                            )
                            // /employees/{id}
                            .service(
                                web::resource("/{employee_id}")
                                    .route(web::get().to(employee::get_employee))
                                    .route(web::put().to(employee::update_employee))
                                    .route(web::delete().to(employee::delete_employee)),
                            )
                            .service(
                                web::resource("/{employee_id}/leave-balance")
                                    .route(web::get().to(leave_request::get_balance))
                                    .route(web::put().to(leave_request::update_balance)),
                            )
                            .service(
                                web::resource("/{employee_id}/payslips/monthly")
                                    .route(web::get().to(payroll::monthly_payslip)),
                            )
                            .service(
                                web::resource("/{employee_id}/payslips/leave")
                                    .route(web::post().to(payroll::leave_payslip)),
                            )
                            .service(
                                web::resource("/{employee_id}/payslips/final-settlement")
                                    .route(web::post().to(payroll::final_settlement)),
                            ),
                    )
                    .service(
                        web::scope("/leave")
                            .service(
                                web::resource("")
                                    .route(web::get().to(leave_request::leave_list))
                                    .route(web::post().to(leave_request::create_leave)),
                            )
                            .service(
                                web::resource("/{leave_id}")
                                    .route(web::get().to(leave_request::get_leave)),
                            )
                            .service(
                                web::resource("/{leave_id}/approve")
                                    .route(web::put().to(leave_request::approve_leave)),
                            )
                            .service(
                                web::resource("/{leave_id}/reject")
                                    .route(web::put().to(leave_request::reject_leave)),
                            ),
                    )
                    .service(
                        web::scope("/payroll").service(
                            web::scope("/runs")
                                .service(
                                    web::resource("")
                                        .route(web::post().to(payroll::run_payroll))
                                        .route(web::get().to(payroll::list_runs)),
                                )
                                .service(
                                    web::resource("/{run_id}")
                                        .route(web::get().to(payroll::get_run)),
                                )
                                .service(
                                    web::resource("/{run_id}/sif")
                                        .route(web::get().to(payroll::download_sif)),
                                ),
                        ),
                    )
                    .service(web::resource("/audit").route(web::get().to(audit::list_audit))),
            ),
    );
}
