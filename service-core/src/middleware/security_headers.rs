use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, header},
    middleware::Next,
    response::Response,
};

const HSTS: &str = "max-age=31536000; includeSubDomains";

/// Header set applied to a response, chosen by request path.
struct HeaderPolicy {
    content_security_policy: &'static str,
    frame_options: &'static str,
}

/// API responses are never rendered or framed.
const API_POLICY: HeaderPolicy = HeaderPolicy {
    content_security_policy: "default-src 'none'; frame-ancestors 'none'",
    frame_options: "DENY",
};

/// Swagger UI loads its own inline scripts and styles.
const DOCS_POLICY: HeaderPolicy = HeaderPolicy {
    content_security_policy: "default-src 'self'; \
         script-src 'self' 'unsafe-inline'; \
         style-src 'self' 'unsafe-inline'; \
         img-src 'self' data:; \
         font-src 'self'; \
         connect-src 'self'",
    frame_options: "SAMEORIGIN",
};

fn policy_for(path: &str) -> &'static HeaderPolicy {
    if path.starts_with("/docs") || path == "/.well-known/openapi.json" {
        &DOCS_POLICY
    } else {
        &API_POLICY
    }
}

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let policy = policy_for(req.uri().path());
    let mut response = next.run(req).await;

    let entries: [(HeaderName, &'static str); 4] = [
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::STRICT_TRANSPORT_SECURITY, HSTS),
        (header::CONTENT_SECURITY_POLICY, policy.content_security_policy),
        (header::X_FRAME_OPTIONS, policy.frame_options),
    ];

    let headers = response.headers_mut();
    for (name, value) in entries {
        headers.insert(name, HeaderValue::from_static(value));
    }

    response
}
