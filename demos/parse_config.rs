//! Parse a configuration string and walk the resulting model.

fn main() {
    let source = "\
server {
    listen 8080;
    host 127.0.0.1;
    server_name example.com www.example.com;
    error_page 404 /err/404.html;
    error_page 500 502 /err/5xx.html;
    client_max_body_size 10m;

    location / {
        methods GET HEAD;
        root /var/www/html;
        index index.html,index.htm;
        autoindex on;
    }

    location /cgi-bin {
        methods GET POST;
        cgi_extension .php,.py;
        upload_store /var/uploads;
    }
}
";

    let config = match webconf_rs::parse_str(source) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("parse failed: {e}");
            return;
        }
    };

    for server in &config.servers {
        println!("server {}:{}", server.host, server.port);
        println!("  names: {:?}", server.server_names);
        println!("  body cap: {} bytes", server.client_max_body_size);
        for (code, page) in &server.error_pages {
            println!("  error {code} -> {page}");
        }
        for location in &server.locations {
            let methods: Vec<_> = location.methods.iter().map(|m| m.as_str()).collect();
            println!("  location {} (methods {})", location.path, methods.join(", "));
            if !location.index_files.is_empty() {
                println!("    index: {:?}", location.index_files);
            }
            if !location.cgi_extensions.is_empty() {
                println!("    cgi: {:?}", location.cgi_extensions);
            }
        }
    }
}
